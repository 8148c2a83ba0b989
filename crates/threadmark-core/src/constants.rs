//! Application-wide constants
//!
//! Timing defaults and the host application's markup vocabulary.
//! Everything tunable at runtime also has a field in [`crate::config::EngineConfig`].

use std::time::Duration;

/// Delay between two probes for a non-empty message list.
pub const FAST_LOOP_DELAY: Duration = Duration::from_millis(400);

/// Delay between two reconciliation passes once messages are visible.
pub const LOOP_DELAY: Duration = Duration::from_millis(1000);

/// Probes attempted before the scheduler falls back to a long wait.
pub const PROBE_RETRIES: u32 = 10;

/// Upper bound for the long wait after repeated exhausted probes.
pub const MAX_BACKOFF_DELAY: Duration = Duration::from_secs(8);

/// Distinct recent authors kept per root message.
pub const MAX_RECENT_AUTHORS: usize = 5;

/// Scroll offset (px) at or below which older messages are requested.
pub const INFINITE_SCROLL_HEIGHT: f64 = 360.0;

/// Value of `<meta name="apple-mobile-web-app-title">` identifying the host.
pub const HOST_APP_TITLE: &str = "Mattermost";

/// Class carried by every counter the presenter paints.
pub const COUNTER_CLASS: &str = "threadmark-counter";

/// Class toggled on `<body>` while the host runs a dark theme.
pub const DARK_THEME_CLASS: &str = "threadmark--dark";

// Host markup vocabulary
pub mod selectors {
    pub const POST_LIST: &str = ".post-list-holder-by-time";
    pub const POSTS: &str = ".post-list-holder-by-time .post";
    pub const REPLY_CLASS: &str = "post--comment";
    pub const EARLIER_ROOT_CLASS: &str = "other--root";
    pub const AVATAR: &str = "img.more-modal__image";
    pub const POST_TIME: &str = "time.post__time";
    pub const REFERENCE_TEXT: &str = ".post__link > span > .theme";
    pub const REPLY_INDICATOR: &str = ".comment-count";
    pub const ROOT_REPLY_INDICATOR: &str = ".post--root .comment-count";
    pub const HEADER_BUTTONS: &str = ".post__header--info button";
    pub const MESSAGE_BODY: &str = ".post-message__text";
    pub const THEME_LINK: &str = "link.code_theme";
    pub const APP_CONTENT: &str = ".app__content";
    pub const HOST_META: &str = r#"meta[name="apple-mobile-web-app-title"]"#;
}

//! Host application detection and the one-shot announcement to the extension runtime.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Outbound messages to the extension runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostMessage {
    /// The page is the host chat application
    ContentIsHost,
}

/// Outbound half of the channel to the extension runtime.
pub trait HostChannel {
    fn notify(&mut self, message: HostMessage);
}

/// Whether the page title meta marks the host application.
pub fn detect_host(meta_title: Option<&str>, host_title: &str) -> bool {
    meta_title == Some(host_title)
}

/// Announce the host once. Returns whether it was detected.
///
/// Callers start the scheduler only when this returns `true`.
pub fn announce_host<C: HostChannel + ?Sized>(
    meta_title: Option<&str>,
    host_title: &str,
    channel: &mut C,
) -> bool {
    if !detect_host(meta_title, host_title) {
        return false;
    }
    info!("host: detected {}", host_title);
    channel.notify(HostMessage::ContentIsHost);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingChannel {
        sent: Vec<HostMessage>,
    }

    impl HostChannel for RecordingChannel {
        fn notify(&mut self, message: HostMessage) {
            self.sent.push(message);
        }
    }

    #[test]
    fn test_detect_host() {
        assert!(detect_host(Some("Mattermost"), "Mattermost"));
        assert!(!detect_host(Some(" Mattermost "), "Mattermost"));
        assert!(!detect_host(Some("mattermost"), "Mattermost"));
        assert!(!detect_host(Some("Slack"), "Mattermost"));
        assert!(!detect_host(None, "Mattermost"));
    }

    #[test]
    fn test_announce_sends_once_when_detected() {
        let mut channel = RecordingChannel::default();
        assert!(announce_host(Some("Mattermost"), "Mattermost", &mut channel));
        assert_eq!(channel.sent, vec![HostMessage::ContentIsHost]);
    }

    #[test]
    fn test_announce_silent_for_other_pages() {
        let mut channel = RecordingChannel::default();
        assert!(!announce_host(Some("Other"), "Mattermost", &mut channel));
        assert!(channel.sent.is_empty());
    }

    #[test]
    fn test_message_wire_format() {
        let json = serde_json::to_string(&HostMessage::ContentIsHost).unwrap();
        assert_eq!(json, r#"{"value":"CONTENT_IS_HOST"}"#);
    }
}

//! Dark/light theme sync.
//!
//! The host swaps a stylesheet when the user changes theme. Each time the
//! stylesheet reference changes, the application background is classified
//! and the page is switched to the matching mode.

use serde::Serialize;
use tracing::debug;

use crate::canonical::Canonicalizer;
use crate::constants::DARK_THEME_CLASS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    /// Class the presenter keeps on `<body>` for this mode.
    pub fn body_class(self) -> Option<&'static str> {
        match self {
            ThemeMode::Light => None,
            ThemeMode::Dark => Some(DARK_THEME_CLASS),
        }
    }
}

#[derive(Debug, Default)]
pub struct ThemeSync {
    last_source: Option<String>,
}

impl ThemeSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.last_source = None;
    }

    /// Returns the mode to apply when the theme source changed since the last call.
    ///
    /// The new source is remembered even when no background color is
    /// available, so a change is classified at most once.
    pub fn observe(
        &mut self,
        source: Option<String>,
        background: impl FnOnce() -> Option<String>,
        canonicalizer: &dyn Canonicalizer,
    ) -> Option<ThemeMode> {
        let source = source?;
        if self.last_source.as_deref() == Some(source.as_str()) {
            return None;
        }
        self.last_source = Some(source);

        let color = background()?;
        let mode = if canonicalizer.is_light(&color) {
            ThemeMode::Light
        } else {
            ThemeMode::Dark
        };
        debug!("theme: {:?} background {} -> {:?}", self.last_source, color, mode);
        Some(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::TextCanonicalizer;

    fn bg(color: &'static str) -> impl FnOnce() -> Option<String> {
        move || Some(color.to_string())
    }

    #[test]
    fn test_first_source_is_classified() {
        let mut sync = ThemeSync::new();
        let mode = sync.observe(Some("dark.css".into()), bg("rgb(30, 30, 30)"), &TextCanonicalizer);
        assert_eq!(mode, Some(ThemeMode::Dark));
        assert_eq!(ThemeMode::Dark.body_class(), Some(DARK_THEME_CLASS));
    }

    #[test]
    fn test_unchanged_source_is_ignored() {
        let mut sync = ThemeSync::new();
        sync.observe(Some("light.css".into()), bg("#ffffff"), &TextCanonicalizer);

        let mode = sync.observe(Some("light.css".into()), bg("#000000"), &TextCanonicalizer);
        assert_eq!(mode, None);
    }

    #[test]
    fn test_source_change_switches_mode() {
        let mut sync = ThemeSync::new();
        sync.observe(Some("dark.css".into()), bg("#111"), &TextCanonicalizer);

        let mode = sync.observe(Some("light.css".into()), bg("#fafafa"), &TextCanonicalizer);
        assert_eq!(mode, Some(ThemeMode::Light));
        assert_eq!(ThemeMode::Light.body_class(), None);
    }

    #[test]
    fn test_missing_background_consumes_change() {
        let mut sync = ThemeSync::new();
        assert_eq!(sync.observe(Some("dark.css".into()), || None, &TextCanonicalizer), None);
        assert_eq!(sync.observe(Some("dark.css".into()), bg("#111"), &TextCanonicalizer), None);
    }

    #[test]
    fn test_missing_source_does_nothing() {
        let mut sync = ThemeSync::new();
        assert_eq!(sync.observe(None, bg("#111"), &TextCanonicalizer), None);
    }
}

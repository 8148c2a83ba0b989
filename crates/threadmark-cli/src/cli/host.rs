use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use threadmark_core::dom::SnapshotView;
use threadmark_core::host::{announce_host, HostChannel, HostMessage};
use threadmark_core::EngineConfig;
use tracing::warn;

/// Host channel writing each message as a JSON line.
pub struct JsonChannel<W: Write> {
    out: W,
}

impl<W: Write> JsonChannel<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> HostChannel for JsonChannel<W> {
    fn notify(&mut self, message: HostMessage) {
        let written = serde_json::to_writer(&mut self.out, &message)
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(self.out))
            .and_then(|_| self.out.flush());
        if let Err(e) = written {
            warn!("host: failed to send {:?}: {}", message, e);
        }
    }
}

/// Announce the snapshot's host if it is the expected chat application.
pub fn detect_snapshot_host<W: Write>(
    view: &SnapshotView,
    config: &EngineConfig,
    channel: &mut JsonChannel<W>,
) -> bool {
    announce_host(view.host_title().as_deref(), &config.host_title, channel)
}

/// `detect-host` subcommand. Returns whether the host was detected.
pub fn run_detect_host(path: &Path, config: &EngineConfig) -> Result<bool> {
    let view = SnapshotView::open(path, config)
        .with_context(|| format!("Failed to open snapshot: {}", path.display()))?;
    let mut channel = JsonChannel::new(std::io::stdout().lock());
    Ok(detect_snapshot_host(&view, config, &mut channel))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str) -> String {
        format!(
            r#"<html><head><meta name="apple-mobile-web-app-title" content="{}"></head><body></body></html>"#,
            title
        )
    }

    #[test]
    fn test_detected_host_is_announced() {
        let config = EngineConfig::default();
        let view = SnapshotView::parse(&page("Mattermost"), &config).unwrap();
        let mut channel = JsonChannel::new(Vec::new());

        assert!(detect_snapshot_host(&view, &config, &mut channel));
        let out = String::from_utf8(channel.into_inner()).unwrap();
        assert_eq!(out, "{\"value\":\"CONTENT_IS_HOST\"}\n");
    }

    #[test]
    fn test_other_page_stays_silent() {
        let config = EngineConfig::default();
        let view = SnapshotView::parse(&page("Some Wiki"), &config).unwrap();
        let mut channel = JsonChannel::new(Vec::new());

        assert!(!detect_snapshot_host(&view, &config, &mut channel));
        assert!(channel.into_inner().is_empty());
    }

    #[test]
    fn test_configured_host_title() {
        let config = EngineConfig {
            host_title: "Team Chat".to_string(),
            ..EngineConfig::default()
        };
        let view = SnapshotView::parse(&page("Team Chat"), &config).unwrap();
        let mut channel = JsonChannel::new(Vec::new());

        assert!(detect_snapshot_host(&view, &config, &mut channel));
    }
}

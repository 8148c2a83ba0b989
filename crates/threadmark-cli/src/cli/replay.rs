use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use threadmark_core::dom::SnapshotView;
use threadmark_core::{Decision, Engine, EngineConfig, MessageView};
use tracing::{info, warn};

use super::presenter::JsonPresenter;

/// Totals over a replayed snapshot sequence
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    pub snapshots: usize,
    pub processed: usize,
    pub skipped: usize,
    pub resets: usize,
    /// Snapshots with no rendered message
    pub empty: usize,
    pub roots_tracked: usize,
    pub replies_linked: usize,
    /// Times the view was scrolled close enough to the top to load older messages
    pub older_requests: usize,
}

/// Replay snapshots in order, one reconciliation pass per snapshot.
///
/// The snapshots share one view, so consecutive files behave like successive
/// renders of the same page.
pub fn run_replay<W: Write>(
    snapshots: &[PathBuf],
    config: &EngineConfig,
    out: W,
    pretty: bool,
) -> Result<ReplaySummary> {
    let Some((first, _)) = snapshots.split_first() else {
        anyhow::bail!("No snapshots to replay");
    };

    let view = SnapshotView::open(first, config)
        .with_context(|| format!("Failed to open snapshot: {}", first.display()))?;
    let mut engine = Engine::new(config);
    let mut presenter = JsonPresenter::new(&view, out, pretty);
    let mut summary = ReplaySummary::default();

    for (i, path) in snapshots.iter().enumerate() {
        if i > 0 {
            view.reload(path)
                .with_context(|| format!("Failed to load snapshot: {}", path.display()))?;
        }
        summary.snapshots += 1;

        let window = view.visible_messages();
        let report = match engine.run_pass(&window, &view, &mut presenter) {
            Ok(report) => report,
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                summary.empty += 1;
                continue;
            }
        };

        match report.decision {
            None => summary.skipped += 1,
            Some(decision) => {
                summary.processed += 1;
                if decision == Decision::ResetAndProcess {
                    summary.resets += 1;
                }
            }
        }
        summary.replies_linked += report.link.replies_linked;
        info!(
            "{}: {} messages, {:?}",
            path.display(),
            window.len(),
            report.decision
        );
    }

    summary.roots_tracked = engine.records().len();
    summary.older_requests = view.more_requests();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const FIRST: &str = r#"<div class="post-list-holder-by-time">
        <div id="r1" class="post post--root">
          <div class="post__header--info"><button>reply</button></div>
          <div class="post-message__text">alpha</div>
          <span class="comment-count">2</span>
        </div>
        <div id="a" class="post post--comment">
          <img class="more-modal__image" src="alice.png">
          <time class="post__time" datetime="2024-05-01T09:00:00Z"></time>
        </div>
      </div>"#;

    const SECOND: &str = r#"<div class="post-list-holder-by-time">
        <div id="r1" class="post post--root">
          <div class="post__header--info"><button>reply</button></div>
          <div class="post-message__text">alpha</div>
          <span class="comment-count">2</span>
        </div>
        <div id="a" class="post post--comment">
          <img class="more-modal__image" src="alice.png">
          <time class="post__time" datetime="2024-05-01T09:00:00Z"></time>
        </div>
        <div id="b" class="post post--comment">
          <img class="more-modal__image" src="bob.png">
          <time class="post__time" datetime="2024-05-01T09:02:00Z"></time>
        </div>
      </div>"#;

    fn write(dir: &Path, name: &str, markup: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, markup).unwrap();
        path
    }

    #[test]
    fn test_replay_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let snapshots = vec![
            write(dir.path(), "1.html", FIRST),
            write(dir.path(), "2.html", FIRST),
            write(dir.path(), "3.html", SECOND),
            write(dir.path(), "4.html", "<html><body></body></html>"),
        ];
        let mut out = Vec::new();

        let summary = run_replay(&snapshots, &EngineConfig::default(), &mut out, false).unwrap();

        assert_eq!(
            summary,
            ReplaySummary {
                snapshots: 4,
                processed: 2,
                skipped: 1,
                resets: 1,
                empty: 1,
                roots_tracked: 1,
                replies_linked: 2,
                older_requests: 0,
            }
        );

        let lines: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1]["roots"][0]["recentAuthors"],
            serde_json::json!(["alice.png", "bob.png"])
        );
    }

    #[test]
    fn test_replay_requires_snapshots() {
        assert!(run_replay(&[], &EngineConfig::default(), Vec::new(), false).is_err());
    }

    #[test]
    fn test_replay_missing_snapshot() {
        let err = run_replay(
            &[PathBuf::from("/nonexistent/snapshot.html")],
            &EngineConfig::default(),
            Vec::new(),
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to open snapshot"));
    }
}

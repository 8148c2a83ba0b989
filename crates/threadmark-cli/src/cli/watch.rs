//! `watch` subcommand: follow a snapshot file that is rewritten as the host
//! page changes, and run the scheduler over it until interrupted.
//!
//! Each line read from stdin is a navigation to the location it names.

use std::cell::Cell;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use threadmark_core::dom::SnapshotView;
use threadmark_core::{EngineConfig, MessageView, Navigation, SchedulerExit, Session, ViewMessage};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::host::{detect_snapshot_host, JsonChannel};
use super::presenter::JsonPresenter;

/// File identity used to notice rewrites
type Stamp = (Option<SystemTime>, u64);

/// A [`SnapshotView`] that reloads its file whenever it changes on disk.
pub struct WatchedSnapshot {
    path: PathBuf,
    view: SnapshotView,
    stamp: Cell<Stamp>,
}

impl WatchedSnapshot {
    pub fn open(path: &Path, config: &EngineConfig) -> Result<Self> {
        let stamp = stamp_of(path)
            .with_context(|| format!("Failed to stat snapshot: {}", path.display()))?;
        let view = SnapshotView::open(path, config)
            .with_context(|| format!("Failed to open snapshot: {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            view,
            stamp: Cell::new(stamp),
        })
    }

    pub fn view(&self) -> &SnapshotView {
        &self.view
    }

    /// Reload the document if the file changed. A failed read keeps the
    /// previous document.
    fn refresh(&self) {
        let stamp = match stamp_of(&self.path) {
            Ok(stamp) => stamp,
            Err(e) => {
                warn!("watch: cannot stat {}: {}", self.path.display(), e);
                return;
            }
        };
        if stamp == self.stamp.get() {
            return;
        }

        match self.view.reload(&self.path) {
            Ok(()) => {
                debug!("watch: reloaded {}", self.path.display());
                self.stamp.set(stamp);
            }
            Err(e) => warn!("watch: {}", e),
        }
    }
}

fn stamp_of(path: &Path) -> std::io::Result<Stamp> {
    let meta = std::fs::metadata(path)?;
    Ok((meta.modified().ok(), meta.len()))
}

impl MessageView for WatchedSnapshot {
    fn visible_messages(&self) -> Vec<ViewMessage> {
        self.refresh();
        self.view.visible_messages()
    }

    fn reply_indicator_count(&self) -> usize {
        self.view.reply_indicator_count()
    }

    fn placed_counter_count(&self) -> usize {
        self.view.placed_counter_count()
    }

    fn theme_source(&self) -> Option<String> {
        self.view.theme_source()
    }

    fn background_color(&self) -> Option<String> {
        self.view.background_color()
    }

    fn scroll_offset(&self) -> Option<f64> {
        self.view.scroll_offset()
    }

    fn request_more_messages(&self) {
        info!("watch: scrolled near the top, requesting older messages");
        self.view.request_more_messages();
    }
}

/// Run a session over `watched` until `shutdown` fires.
pub async fn watch_snapshot<W: Write>(
    watched: &WatchedSnapshot,
    config: &EngineConfig,
    out: W,
    pretty: bool,
    navigations: &mut mpsc::Receiver<Navigation>,
    shutdown: &CancellationToken,
) -> SchedulerExit {
    let mut session = Session::new(config);
    let mut presenter = JsonPresenter::new(watched.view(), out, pretty);
    let exit = session
        .run(watched, &mut presenter, navigations, shutdown)
        .await;
    info!(
        "watch: stopped after {} cycles and {} navigations",
        exit.cycles,
        session.navigations()
    );
    exit
}

/// Forward non-empty stdin lines as navigations until stdin closes.
///
/// Runs on its own thread: a blocking stdin read must not hold up runtime
/// shutdown.
fn forward_navigations(tx: mpsc::Sender<Navigation>) {
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("watch: stdin read failed: {}", e);
                break;
            }
        };
        let location = line.trim();
        if location.is_empty() {
            continue;
        }
        if tx.blocking_send(Navigation::new(location)).is_err() {
            break;
        }
    }
}

/// `watch` subcommand
#[tokio::main(flavor = "current_thread")]
pub async fn run_watch(
    path: &Path,
    config: &EngineConfig,
    pretty: bool,
    skip_host_check: bool,
) -> Result<()> {
    let watched = WatchedSnapshot::open(path, config)?;

    let mut channel = JsonChannel::new(std::io::stdout());
    if !detect_snapshot_host(watched.view(), config, &mut channel) && !skip_host_check {
        anyhow::bail!(
            "{} is not a {} page (use --skip-host-check to watch anyway)",
            path.display(),
            config.host_title
        );
    }

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("watch: interrupted");
        }
        on_signal.cancel();
    });

    let (tx, mut rx) = mpsc::channel(16);
    std::thread::spawn(move || forward_navigations(tx));

    eprintln!("Watching {}", path.display());
    watch_snapshot(
        &watched,
        config,
        std::io::stdout(),
        pretty,
        &mut rx,
        &shutdown,
    )
    .await;
    Ok(())
}

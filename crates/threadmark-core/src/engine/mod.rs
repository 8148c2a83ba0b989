//! The reconciliation engine.
//!
//! One [`Engine`] lives for one conversation view. It owns the root store and
//! the change detector; nothing else mutates them. A pass runs to completion
//! synchronously, so no locking is involved.

pub mod detector;
pub mod linker;

pub use detector::{ChangeDetector, Decision};
pub use linker::{LinkStats, Linker};

use tracing::{debug, info, warn};

use crate::canonical::{Canonicalizer, TextCanonicalizer};
use crate::config::EngineConfig;
use crate::error::WindowError;
use crate::models::{RootMessageRecord, ViewMessage};
use crate::pagination::PaginationTrigger;
use crate::presenter::Presenter;
use crate::store::RootStore;
use crate::theme::{ThemeMode, ThemeSync};
use crate::view::MessageView;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// `None` when the pass was a no-op
    pub decision: Option<Decision>,
    pub link: LinkStats,
    pub theme: Option<ThemeMode>,
    pub requested_more: bool,
    /// The presenter failed; the store is unaffected
    pub presenter_failed: bool,
}

pub struct Engine {
    store: RootStore,
    detector: ChangeDetector,
    theme: ThemeSync,
    pagination: PaginationTrigger,
    canonicalizer: Box<dyn Canonicalizer>,
    max_recent_authors: usize,
}

impl Engine {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_canonicalizer(config, Box::new(TextCanonicalizer))
    }

    pub fn with_canonicalizer(
        config: &EngineConfig,
        canonicalizer: Box<dyn Canonicalizer>,
    ) -> Self {
        Self {
            store: RootStore::new(),
            detector: ChangeDetector::new(),
            theme: ThemeSync::new(),
            pagination: PaginationTrigger::new(config.pagination_threshold),
            canonicalizer,
            max_recent_authors: config.max_recent_authors,
        }
    }

    pub fn store(&self) -> &RootStore {
        &self.store
    }

    pub fn records(&self) -> &[RootMessageRecord] {
        self.store.records()
    }

    /// Back to the state of a freshly created engine.
    pub fn reset(&mut self) {
        self.store.clear();
        self.detector.reset();
        self.theme.reset();
    }

    /// Run one reconciliation pass over `window`.
    ///
    /// `window` is the list of visible messages the caller just read from
    /// `view`. An empty window yields [`WindowError::NoDataYet`] and touches nothing.
    pub fn run_pass<V, P>(
        &mut self,
        window: &[ViewMessage],
        view: &V,
        presenter: &mut P,
    ) -> Result<PassReport, WindowError>
    where
        V: MessageView + ?Sized,
        P: Presenter + ?Sized,
    {
        if window.is_empty() {
            return Err(WindowError::NoDataYet);
        }

        let mut report = PassReport::default();

        report.theme = self.theme.observe(
            view.theme_source(),
            || view.background_color(),
            self.canonicalizer.as_ref(),
        );
        if let Some(mode) = report.theme {
            if let Err(e) = presenter.apply_theme(mode) {
                warn!("engine: theme update failed: {}", e);
            }
        }

        report.requested_more = self.pagination.check(view);

        let decision = self.detector.assess(
            window,
            view.reply_indicator_count(),
            view.placed_counter_count(),
        )?;
        if !decision.needs_processing() {
            return Ok(report);
        }
        report.decision = Some(decision);

        if decision == Decision::ResetAndProcess {
            info!(
                "engine: counters out of sync, dropping {} roots and {} replies",
                self.store.len(),
                self.store.processed_count()
            );
            self.store.clear();
        }

        let linker = Linker::new(self.canonicalizer.as_ref(), self.max_recent_authors);
        report.link = linker.reconcile(window, &mut self.store);
        debug!(
            "engine: pass over {} messages -> {:?} ({} roots tracked)",
            window.len(),
            report.link,
            self.store.len()
        );

        if let Err(e) = presenter.render(self.store.records()) {
            warn!("engine: counter update failed: {}", e);
            report.presenter_failed = true;
        }

        Ok(report)
    }
}

//! Cheap per-cycle change detection.
//!
//! Only the window boundaries and the indicator/counter tally are compared.
//! A change that happens strictly inside an unchanged window goes unnoticed
//! until the next cycle that moves a boundary. That is accepted: the check
//! stays O(1) and most cycles are no-ops.

use tracing::debug;

use crate::error::WindowError;
use crate::models::ViewMessage;

/// What a reconciliation pass has to do this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Nothing entered or left the window
    Skip,
    /// Store is out of sync with the page; empty it, then process
    ResetAndProcess,
    Process,
}

impl Decision {
    pub fn needs_processing(self) -> bool {
        !matches!(self, Decision::Skip)
    }
}

#[derive(Debug, Default)]
pub struct ChangeDetector {
    last_first_id: Option<String>,
    last_last_id: Option<String>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the observed boundaries so the next window is always processed.
    pub fn reset(&mut self) {
        self.last_first_id = None;
        self.last_last_id = None;
    }

    /// Compare `window` against the previous cycle.
    ///
    /// `live_indicators` is the number of native "has replies" indicators in
    /// the page, `placed_counters` the number of counters painted so far. Any
    /// disagreement means the store missed a transition (e.g. a fast
    /// navigate-away-and-back between two cycles) and forces a reset.
    pub fn assess(
        &mut self,
        window: &[ViewMessage],
        live_indicators: usize,
        placed_counters: usize,
    ) -> Result<Decision, WindowError> {
        let (Some(first), Some(last)) = (window.first(), window.last()) else {
            return Err(WindowError::NoDataYet);
        };

        let forced = live_indicators != placed_counters;
        if forced {
            debug!(
                "change_detector: indicator count mismatch (live={} placed={})",
                live_indicators, placed_counters
            );
        }

        let unchanged = self.last_first_id.as_deref() == Some(first.id.as_str())
            && self.last_last_id.as_deref() == Some(last.id.as_str());
        if !forced && unchanged {
            return Ok(Decision::Skip);
        }

        self.last_first_id = Some(first.id.clone());
        self.last_last_id = Some(last.id.clone());

        Ok(if forced {
            Decision::ResetAndProcess
        } else {
            Decision::Process
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReplyFragment, ThreadLink};

    fn window(ids: &[&str]) -> Vec<ViewMessage> {
        ids.iter()
            .map(|id| {
                ViewMessage::reply(
                    *id,
                    ReplyFragment {
                        avatar: None,
                        posted_at: None,
                        thread: ThreadLink::Adjacent,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_window_is_no_data() {
        let mut detector = ChangeDetector::new();
        assert_eq!(detector.assess(&[], 0, 0), Err(WindowError::NoDataYet));
    }

    #[test]
    fn test_first_window_is_processed() {
        let mut detector = ChangeDetector::new();
        assert_eq!(detector.assess(&window(&["a", "b"]), 0, 0), Ok(Decision::Process));
    }

    #[test]
    fn test_unchanged_boundaries_skip() {
        let mut detector = ChangeDetector::new();
        detector.assess(&window(&["a", "b", "c"]), 1, 1).unwrap();

        // Interior changes are not observed
        assert_eq!(detector.assess(&window(&["a", "x", "c"]), 1, 1), Ok(Decision::Skip));
    }

    #[test]
    fn test_moved_boundary_processes() {
        let mut detector = ChangeDetector::new();
        detector.assess(&window(&["a", "b"]), 0, 0).unwrap();

        assert_eq!(detector.assess(&window(&["a", "b", "c"]), 0, 0), Ok(Decision::Process));
        assert_eq!(detector.assess(&window(&["a", "b", "c"]), 0, 0), Ok(Decision::Skip));
        assert_eq!(detector.assess(&window(&["z", "b", "c"]), 0, 0), Ok(Decision::Process));
    }

    #[test]
    fn test_count_mismatch_forces_reset_even_when_unchanged() {
        let mut detector = ChangeDetector::new();
        detector.assess(&window(&["a", "b"]), 2, 2).unwrap();

        assert_eq!(
            detector.assess(&window(&["a", "b"]), 2, 0),
            Ok(Decision::ResetAndProcess)
        );
    }

    #[test]
    fn test_reset_forgets_boundaries() {
        let mut detector = ChangeDetector::new();
        detector.assess(&window(&["a", "b"]), 0, 0).unwrap();
        detector.reset();

        assert_eq!(detector.assess(&window(&["a", "b"]), 0, 0), Ok(Decision::Process));
    }
}

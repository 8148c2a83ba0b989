use crate::error::PresentError;
use crate::models::RootMessageRecord;
use crate::theme::ThemeMode;

/// Paints derived state into the host page.
///
/// Failures are reported back to the engine, which logs them and carries on.
/// Nothing a presenter returns can change the root store.
pub trait Presenter {
    /// Render counters for every tracked root, in store order.
    fn render(&mut self, records: &[RootMessageRecord]) -> Result<(), PresentError>;

    /// Switch the page between light and dark styling.
    fn apply_theme(&mut self, _mode: ThemeMode) -> Result<(), PresentError> {
        Ok(())
    }
}

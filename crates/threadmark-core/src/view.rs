use crate::models::ViewMessage;

/// Read access to the host's rendered message list.
///
/// Every call reflects the document at call time. Implementations never
/// cache across calls; the engine does its own change detection.
pub trait MessageView {
    /// Currently rendered messages, oldest first.
    fn visible_messages(&self) -> Vec<ViewMessage>;

    /// Native "has replies" indicators on root messages.
    fn reply_indicator_count(&self) -> usize;

    /// Counters painted by the presenter that are still in the document.
    fn placed_counter_count(&self) -> usize;

    /// Reference to the active theme stylesheet.
    fn theme_source(&self) -> Option<String> {
        None
    }

    /// Computed background color of the application content.
    fn background_color(&self) -> Option<String> {
        None
    }

    /// Scroll offset of the message list from its top.
    fn scroll_offset(&self) -> Option<f64> {
        None
    }

    /// Ask the host to load older messages.
    fn request_more_messages(&self) {}
}

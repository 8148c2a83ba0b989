//! Infinite-scroll trigger: near the top of the list, ask the host for older messages.

use crate::view::MessageView;

#[derive(Debug, Clone, Copy)]
pub struct PaginationTrigger {
    threshold: f64,
}

impl PaginationTrigger {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Request more messages if the list is scrolled to within `threshold` of its top.
    pub fn check<V: MessageView + ?Sized>(&self, view: &V) -> bool {
        match view.scroll_offset() {
            Some(offset) if offset <= self.threshold => {
                view.request_more_messages();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ViewMessage;
    use std::cell::Cell;

    struct ScrollView {
        offset: Option<f64>,
        requests: Cell<usize>,
    }

    impl MessageView for ScrollView {
        fn visible_messages(&self) -> Vec<ViewMessage> {
            Vec::new()
        }

        fn reply_indicator_count(&self) -> usize {
            0
        }

        fn placed_counter_count(&self) -> usize {
            0
        }

        fn scroll_offset(&self) -> Option<f64> {
            self.offset
        }

        fn request_more_messages(&self) {
            self.requests.set(self.requests.get() + 1);
        }
    }

    fn view(offset: Option<f64>) -> ScrollView {
        ScrollView {
            offset,
            requests: Cell::new(0),
        }
    }

    #[test]
    fn test_requests_near_top() {
        let trigger = PaginationTrigger::new(360.0);
        let view = view(Some(120.0));
        assert!(trigger.check(&view));
        assert_eq!(view.requests.get(), 1);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let trigger = PaginationTrigger::new(360.0);
        assert!(trigger.check(&view(Some(360.0))));
        assert!(!trigger.check(&view(Some(360.5))));
    }

    #[test]
    fn test_unknown_offset_never_requests() {
        let trigger = PaginationTrigger::new(360.0);
        let view = view(None);
        assert!(!trigger.check(&view));
        assert_eq!(view.requests.get(), 0);
    }
}

use std::collections::VecDeque;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::message::PresentationHandle;

/// Most recent distinct reply authors, oldest first.
///
/// An author already present is never added twice and keeps its position.
/// Once `capacity` is exceeded the oldest entry is evicted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecentAuthors {
    #[serde(skip)]
    capacity: usize,
    authors: VecDeque<String>,
}

impl RecentAuthors {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            authors: VecDeque::with_capacity(capacity.max(1) + 1),
        }
    }

    /// Record an author. Returns `false` if the author was already listed.
    pub fn observe(&mut self, author: &str) -> bool {
        if self.contains(author) {
            return false;
        }
        self.authors.push_back(author.to_string());
        if self.authors.len() > self.capacity {
            self.authors.pop_front();
        }
        true
    }

    pub fn contains(&self, author: &str) -> bool {
        self.authors.iter().any(|a| a == author)
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.authors.iter().cloned().collect()
    }
}

/// A top-level message known to have at least one reply.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootMessageRecord {
    pub id: String,
    /// Formatting-independent key of the body, matched against reply references
    pub canonical_key: String,
    /// Last observed reply count, overwritten on every observation
    pub reply_count: u32,
    pub recent_authors: RecentAuthors,
    /// Time of the most recent linked reply, `None` until one is linked
    pub last_reply_at: Option<DateTime<FixedOffset>>,
    #[serde(skip)]
    pub presentation_handle: PresentationHandle,
}

impl RootMessageRecord {
    pub fn new(
        id: impl Into<String>,
        canonical_key: impl Into<String>,
        reply_count: u32,
        max_recent_authors: usize,
        presentation_handle: PresentationHandle,
    ) -> Self {
        Self {
            id: id.into(),
            canonical_key: canonical_key.into(),
            reply_count,
            recent_authors: RecentAuthors::with_capacity(max_recent_authors),
            last_reply_at: None,
            presentation_handle,
        }
    }

    /// Fold a linked reply into this record.
    pub fn record_reply(&mut self, author: &str, posted_at: DateTime<FixedOffset>) {
        self.recent_authors.observe(author);
        self.last_reply_at = Some(posted_at);
    }
}

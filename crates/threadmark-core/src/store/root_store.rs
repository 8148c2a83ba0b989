//! Rolling state of root messages for the current conversation view.
//!
//! Records are kept in append order, which is document order: the adjacency
//! heuristic links a reply to the most recently appended root. Records are
//! never removed individually, only by [`RootStore::clear`].

use std::collections::{HashMap, HashSet};

use crate::models::RootMessageRecord;

#[derive(Debug, Default)]
pub struct RootStore {
    records: Vec<RootMessageRecord>,
    /// id -> position in `records`
    index: HashMap<String, usize>,
    /// Reply ids already folded into some record
    processed_replies: HashSet<String>,
}

impl RootStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record and every processed reply id.
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
        self.processed_replies.clear();
    }

    // ===== Records =====

    pub fn records(&self) -> &[RootMessageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&RootMessageRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut RootMessageRecord> {
        self.index.get(id).map(|&i| &mut self.records[i])
    }

    /// The most recently appended record.
    pub fn last_mut(&mut self) -> Option<&mut RootMessageRecord> {
        self.records.last_mut()
    }

    /// First record, in append order, whose canonical key equals `key`.
    pub fn find_by_key_mut(&mut self, key: &str) -> Option<&mut RootMessageRecord> {
        self.records.iter_mut().find(|r| r.canonical_key == key)
    }

    /// Append a record. Returns `false` and leaves the store untouched if the id is taken.
    pub fn append(&mut self, record: RootMessageRecord) -> bool {
        if self.index.contains_key(&record.id) {
            return false;
        }
        self.index.insert(record.id.clone(), self.records.len());
        self.records.push(record);
        true
    }

    // ===== Processed replies =====

    pub fn is_processed(&self, reply_id: &str) -> bool {
        self.processed_replies.contains(reply_id)
    }

    pub fn mark_processed(&mut self, reply_id: &str) {
        self.processed_replies.insert(reply_id.to_string());
    }

    pub fn processed_count(&self) -> usize {
        self.processed_replies.len()
    }
}

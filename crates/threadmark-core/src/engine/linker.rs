//! Single left-to-right pass that classifies visible messages and links
//! replies to their root.
//!
//! Two linking heuristics:
//! - **Adjacent**: the owner is the most recently appended root record. This
//!   assumes rendering order matches conversation order, so a reply that the
//!   host renders under an unrelated root gets attributed to that root. Known
//!   limitation, not corrected here.
//! - **Earlier**: the reply quotes an older root; its quote is canonicalized
//!   and matched against record keys. Two roots with the same key are
//!   indistinguishable and the first one wins.
//!
//! Partially rendered messages are skipped without error and picked up on a
//! later pass.

use chrono::{DateTime, FixedOffset};
use tracing::trace;

use crate::canonical::{strip_html_tags, Canonicalizer};
use crate::models::{
    ReplyFragment, RootFragment, RootMessageRecord, ThreadLink, ViewMessage, ViewMessageKind,
};
use crate::store::RootStore;

/// What one pass over the window did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub roots_added: usize,
    pub roots_updated: usize,
    pub replies_linked: usize,
    /// Replies whose root is not tracked; retried on later passes
    pub replies_unresolved: usize,
    /// Messages missing a required sub-element
    pub skipped_partial: usize,
}

pub struct Linker<'a> {
    canonicalizer: &'a dyn Canonicalizer,
    max_recent_authors: usize,
}

enum ReplyOutcome {
    AlreadyLinked,
    Linked,
    Unresolved,
    Partial,
}

enum RootOutcome {
    NoReplies,
    Added,
    Updated,
    Partial,
}

impl<'a> Linker<'a> {
    pub fn new(canonicalizer: &'a dyn Canonicalizer, max_recent_authors: usize) -> Self {
        Self {
            canonicalizer,
            max_recent_authors,
        }
    }

    /// Classify and link every message of `window` (oldest first) into `store`.
    pub fn reconcile(&self, window: &[ViewMessage], store: &mut RootStore) -> LinkStats {
        let mut stats = LinkStats::default();

        for message in window {
            match &message.kind {
                ViewMessageKind::Reply(reply) => match self.link_reply(&message.id, reply, store) {
                    ReplyOutcome::AlreadyLinked => {}
                    ReplyOutcome::Linked => stats.replies_linked += 1,
                    ReplyOutcome::Unresolved => stats.replies_unresolved += 1,
                    ReplyOutcome::Partial => stats.skipped_partial += 1,
                },
                ViewMessageKind::Root(root) => match self.track_root(&message.id, root, store) {
                    RootOutcome::NoReplies => {}
                    RootOutcome::Added => stats.roots_added += 1,
                    RootOutcome::Updated => stats.roots_updated += 1,
                    RootOutcome::Partial => stats.skipped_partial += 1,
                },
            }
        }

        stats
    }

    fn link_reply(&self, id: &str, reply: &ReplyFragment, store: &mut RootStore) -> ReplyOutcome {
        if store.is_processed(id) {
            return ReplyOutcome::AlreadyLinked;
        }
        // A message tracked as a root is never linked as a reply
        if store.contains(id) {
            trace!("linker: {} is a tracked root, not linking as reply", id);
            return ReplyOutcome::AlreadyLinked;
        }

        let Some(avatar) = reply.avatar.as_deref() else {
            return ReplyOutcome::Partial;
        };
        let Some(posted_at) = reply.posted_at.as_deref().and_then(parse_timestamp) else {
            return ReplyOutcome::Partial;
        };

        let owner = match &reply.thread {
            ThreadLink::Earlier { reference_text } => {
                let Some(reference) = reference_text.as_deref() else {
                    return ReplyOutcome::Partial;
                };
                let key = self.canonicalizer.text_key(reference);
                store.find_by_key_mut(&key)
            }
            ThreadLink::Adjacent => store.last_mut(),
        };

        // Left unprocessed so it resolves once its root scrolls into view
        let Some(owner) = owner else {
            trace!("linker: no tracked root for reply {}", id);
            return ReplyOutcome::Unresolved;
        };

        owner.record_reply(avatar, posted_at);
        store.mark_processed(id);
        ReplyOutcome::Linked
    }

    fn track_root(&self, id: &str, root: &RootFragment, store: &mut RootStore) -> RootOutcome {
        let Some(indicator) = root.reply_indicator.as_deref() else {
            return RootOutcome::NoReplies;
        };
        let Some(reply_count) = parse_count(indicator) else {
            return RootOutcome::Partial;
        };

        if let Some(record) = store.get_mut(id) {
            record.reply_count = reply_count;
            return RootOutcome::Updated;
        }

        let (Some(anchor), Some(body)) = (root.action_anchor.as_ref(), root.body_markup.as_deref())
        else {
            return RootOutcome::Partial;
        };

        let canonical_key = self.canonicalizer.text_key(&strip_html_tags(body));
        store.append(RootMessageRecord::new(
            id,
            canonical_key,
            reply_count,
            self.max_recent_authors,
            anchor.clone(),
        ));
        RootOutcome::Added
    }
}

fn parse_count(indicator: &str) -> Option<u32> {
    indicator.trim().parse().ok()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim()).ok()
}

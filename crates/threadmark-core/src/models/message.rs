//! Messages as read from the rendered list.
//!
//! A [`ViewMessage`] carries only what the markup exposed at query time. Any
//! field may be missing while the host is still rendering; the linker decides
//! what a missing field means.

use std::fmt;

/// Where a presenter attaches the counter for a root message.
///
/// Built by a [`crate::view::MessageView`] and read back only by a
/// [`crate::presenter::Presenter`]. The engine passes it through untouched,
/// so it implements neither `PartialEq` nor `Hash`.
#[derive(Clone)]
pub struct PresentationHandle {
    node_id: String,
    anchor_index: usize,
}

impl PresentationHandle {
    pub fn new(node_id: impl Into<String>, anchor_index: usize) -> Self {
        Self {
            node_id: node_id.into(),
            anchor_index,
        }
    }

    /// Identifier of the node the anchor lives in
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Position of the anchor among its siblings
    pub fn anchor_index(&self) -> usize {
        self.anchor_index
    }
}

impl fmt::Debug for PresentationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PresentationHandle(..)")
    }
}

/// How a reply declares its owning root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadLink {
    /// Belongs to the closest root above it
    Adjacent,
    /// References an earlier, non-adjacent root by quoting its text
    Earlier { reference_text: Option<String> },
}

#[derive(Debug, Clone)]
pub struct RootFragment {
    /// Raw text of the "has replies" indicator, e.g. `"3"`
    pub reply_indicator: Option<String>,
    /// Last action button in the message header
    pub action_anchor: Option<PresentationHandle>,
    /// Message body markup
    pub body_markup: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReplyFragment {
    /// Author avatar identifier (image source)
    pub avatar: Option<String>,
    /// Raw `datetime` of the reply
    pub posted_at: Option<String>,
    pub thread: ThreadLink,
}

#[derive(Debug, Clone)]
pub enum ViewMessageKind {
    Root(RootFragment),
    Reply(ReplyFragment),
}

#[derive(Debug, Clone)]
pub struct ViewMessage {
    pub id: String,
    pub kind: ViewMessageKind,
}

impl ViewMessage {
    pub fn root(id: impl Into<String>, fragment: RootFragment) -> Self {
        Self {
            id: id.into(),
            kind: ViewMessageKind::Root(fragment),
        }
    }

    pub fn reply(id: impl Into<String>, fragment: ReplyFragment) -> Self {
        Self {
            id: id.into(),
            kind: ViewMessageKind::Reply(fragment),
        }
    }

    pub fn is_reply(&self) -> bool {
        matches!(self.kind, ViewMessageKind::Reply(_))
    }
}

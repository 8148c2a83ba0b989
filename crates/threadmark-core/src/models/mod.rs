pub mod message;
pub mod root;

pub use message::{
    PresentationHandle, ReplyFragment, RootFragment, ThreadLink, ViewMessage, ViewMessageKind,
};
pub use root::{RecentAuthors, RootMessageRecord};

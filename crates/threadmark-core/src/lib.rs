pub mod canonical;
pub mod config;
pub mod constants;
pub mod dom;
pub mod engine;
pub mod error;
pub mod host;
pub mod models;
pub mod pagination;
pub mod presenter;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod theme;
pub mod view;

// Re-export the types most callers need at crate root
pub use canonical::{Canonicalizer, TextCanonicalizer};
pub use config::EngineConfig;
pub use engine::{Decision, Engine, PassReport};
pub use error::{ConfigError, PresentError, ViewError, WindowError};
pub use models::{PresentationHandle, RootMessageRecord, ViewMessage};
pub use presenter::Presenter;
pub use scheduler::{Scheduler, SchedulerExit, SchedulerState};
pub use session::{Navigation, Session};
pub use store::RootStore;
pub use view::MessageView;

pub mod config;
pub mod host;
pub mod presenter;
pub mod replay;
pub mod watch;

pub use config::resolve_config;
pub use host::run_detect_host;
pub use presenter::JsonPresenter;
pub use replay::run_replay;
pub use watch::run_watch;

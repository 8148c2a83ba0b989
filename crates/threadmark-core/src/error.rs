use std::path::PathBuf;

/// Raised by a [`crate::presenter::Presenter`]. The engine logs these and moves on.
#[derive(Debug, thiserror::Error)]
pub enum PresentError {
    #[error("Presenter output failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Presenter serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Presenter failed: {0}")]
    Other(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("Invalid selector {selector}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("Failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// The visible window could not be bounded. Distinct from every [`crate::engine::Decision`]:
/// the caller backs off and probes again instead of treating it as an empty conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("No messages rendered yet")]
    NoDataYet,
}

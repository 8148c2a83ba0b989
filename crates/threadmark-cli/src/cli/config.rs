use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use threadmark_core::EngineConfig;

/// `<config dir>/threadmark/config.json`, when the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("threadmark").join("config.json"))
}

/// Engine config from `explicit`, else from the default location if present, else defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<EngineConfig> {
    resolve_config_from(explicit, default_config_path().as_deref())
}

fn resolve_config_from(explicit: Option<&Path>, fallback: Option<&Path>) -> Result<EngineConfig> {
    if let Some(path) = explicit {
        return EngineConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()));
    }

    match fallback {
        Some(path) if path.exists() => {
            tracing::debug!("Using config file {}", path.display());
            EngineConfig::load(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))
        }
        _ => Ok(EngineConfig::default()),
    }
}

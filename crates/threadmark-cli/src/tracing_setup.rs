use std::fs::OpenOptions;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "threadmark_core=info,threadmark_cli=info,warn";

pub fn init_tracing(verbose: bool) -> Result<()> {
    // Check if file logging is enabled via environment variable
    let file_logging = std::env::var("THREADMARK_LOG_FILE").ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("threadmark_core=debug,threadmark_cli=debug,warn")
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    });

    // Stdout carries JSON output, logs go to stderr
    let registry = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(filter),
    );

    if let Some(log_path) = file_logging {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path))?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG);

        registry.with(file_layer).init();
        eprintln!("File logging enabled: {}", log_path);
    } else {
        registry.init();
    }

    Ok(())
}

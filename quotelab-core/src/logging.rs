//! Tracing subscriber setup shared by both binaries.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_VAR: &str = "QUOTELAB_LOG_FILE";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_file: std::env::var(LOG_FILE_VAR).ok().map(PathBuf::from),
        }
    }
}

/// Log to stderr.
pub fn init_console(config: &LoggingConfig) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Log to `config.log_file` if set; otherwise install nothing.
///
/// Used by the dashboard, whose stdout belongs to the terminal UI.
pub fn init_file(config: &LoggingConfig) -> std::io::Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(&config.log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();
    Ok(())
}

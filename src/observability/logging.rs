//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber from the `log` config section
//! - Human-readable console output and JSON file output, independently switchable
//! - Rotate an oversized log file on startup
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - When file output is off, console output is always on

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogConfig, ServerMode};

const BYTES_PER_MIB: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber.
pub fn init_logging(config: &LogConfig, mode: ServerMode) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config, mode)));

    let console = (config.enable_console || !config.enable_file).then(|| {
        fmt::layer()
            .with_target(true)
            .with_ansi(mode == ServerMode::Debug)
    });

    let file = if config.enable_file {
        let path = Path::new(&config.file_path);
        let file = open_log_file(path, config.max_size)?;
        Some(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_current_span(false)
                .with_writer(Mutex::new(file)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()?;

    Ok(())
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_directives(config: &LogConfig, mode: ServerMode) -> String {
    let level = config.effective_level().to_ascii_lowercase();
    let http_level = match mode {
        ServerMode::Debug => "debug",
        ServerMode::Release => "info",
    };
    format!("{level},tower_http={http_level}")
}

fn open_log_file(path: &Path, max_size_mib: u64) -> Result<File, LoggingError> {
    let file_error = |source| LoggingError::File {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(file_error)?;
    }
    rotate_if_oversized(path, max_size_mib).map_err(file_error)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(file_error)
}

/// Move `path` to `path.1` when it has reached `max_size_mib`.
/// Returns whether a rotation happened.
pub fn rotate_if_oversized(path: &Path, max_size_mib: u64) -> std::io::Result<bool> {
    let len = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if max_size_mib == 0 || len < max_size_mib.saturating_mul(BYTES_PER_MIB) {
        return Ok(false);
    }

    let mut rotated = path.as_os_str().to_os_string();
    rotated.push(".1");
    fs::rename(path, PathBuf::from(rotated))?;
    Ok(true)
}

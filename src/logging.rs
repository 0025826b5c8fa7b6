//! Tracing setup.
//!
//! Events are written twice: to stdout in compact form, and to the log file named by
//! [`Config::log_file`](crate::config::Config::log_file) through a non-blocking writer. The file
//! sink is optional; if it cannot be opened the server keeps running with stdout only.
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const FALLBACK_FILE_NAME: &str = "mediclarity.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, Error)]
enum LogFileError {
    #[error("failed to create log directory {}: {source}", dir.display())]
    Directory {
        dir: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to open log file: {0}")]
    Open(#[from] InitError),
}

/// Install the global subscriber.
///
/// `RUST_LOG` controls filtering and defaults to `info`. Calling this more than once is
/// harmless; later calls leave the first subscriber in place.
pub fn init_tracing(log_file: &Path) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    match file_writer(log_file) {
        Ok(writer) => {
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .compact();
            let _ = registry.with(file_layer).try_init();
        }
        Err(error) => {
            // No subscriber exists yet, so this is the only place the failure can surface.
            eprintln!("File logging disabled: {error}");
            let _ = registry.try_init();
        }
    }
}

fn file_writer(log_file: &Path) -> Result<NonBlocking, LogFileError> {
    let appender = open_log_file(log_file)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Ok(writer)
}

/// Open `log_file` for appending, creating its directory first.
fn open_log_file(log_file: &Path) -> Result<RollingFileAppender, LogFileError> {
    let (dir, file_name) = split_log_path(log_file);
    std::fs::create_dir_all(&dir).map_err(|source| LogFileError::Directory {
        dir: dir.clone(),
        source,
    })?;
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)?)
}

/// Split a configured path into the directory and file name the appender expects.
///
/// A bare file name lands in the working directory; a path with no final file component
/// (`logs/..`) gets the default name inside that directory.
fn split_log_path(log_file: &Path) -> (PathBuf, String) {
    let file_name = log_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    let dir = match file_name {
        Some(_) => log_file.parent(),
        None => Some(log_file),
    }
    .filter(|dir| !dir.as_os_str().is_empty())
    .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    (
        dir,
        file_name.unwrap_or_else(|| FALLBACK_FILE_NAME.to_string()),
    )
}

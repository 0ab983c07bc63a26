//! Tracing setup: stdout plus a log file next to the settings.
//!
//! The filter comes from `SILENCE_LOG` and defaults to `info`.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use silence_settings::Settings;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

pub const LOG_ENV_VAR: &str = "SILENCE_LOG";
pub const LOG_FILE_NAME: &str = "silence.log";
const DEFAULT_FILTER: &str = "info";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to prepare log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to create log file at {path}: {source}")]
    CreateLogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// `%LOCALAPPDATA%\Silence\logs`.
pub fn log_directory() -> PathBuf {
    Settings::settings_dir().join("logs")
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init() -> Result<PathBuf, LoggingError> {
    let log_dir = log_directory();
    let log_path = log_dir.join(LOG_FILE_NAME);
    if LOG_GUARD.get().is_some() {
        return Ok(log_path);
    }

    prepare_log_file(&log_dir, &log_path)?;
    let (file_writer, guard) = tracing_appender::non_blocking(rolling::never(&log_dir, LOG_FILE_NAME));

    let stdout_layer = fmt::layer().with_writer(std::io::stdout);
    let file_layer = fmt::layer().with_ansi(false).with_writer(file_writer);
    let subscriber = Registry::default()
        .with(build_env_filter(std::env::var(LOG_ENV_VAR).ok().as_deref()))
        .with(stdout_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = LOG_GUARD.set(guard);

    tracing::info!("logging to {}", log_path.display());
    Ok(log_path)
}

fn prepare_log_file(dir: &Path, path: &Path) -> Result<(), LoggingError> {
    fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|source| LoggingError::CreateLogFile {
            path: path.to_path_buf(),
            source,
        })
}

/// An unparsable directive falls back to the default level.
fn build_env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn log_file_is_created_with_parents() {
        let dir = tempdir().unwrap();
        let logs = dir.path().join("Silence").join("logs");
        let file = logs.join(LOG_FILE_NAME);
        prepare_log_file(&logs, &file).unwrap();
        assert!(file.is_file());

        // Existing content is kept.
        fs::write(&file, "previous run\n").unwrap();
        prepare_log_file(&logs, &file).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "previous run\n");
    }

    #[test]
    fn filter_defaults_to_info() {
        assert_eq!(build_env_filter(None).to_string(), "info");
        assert_eq!(build_env_filter(Some("silence=bogus")).to_string(), "info");
        assert_eq!(
            build_env_filter(Some("silence_host_windows=debug")).to_string(),
            "silence_host_windows=debug"
        );
    }
}

//! Diagnostic logging configuration using tracing

use std::path::PathBuf;

use chrono::Utc;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{ErrorCode, InternalError, Result, ResultExt};

/// Environment variable holding the tracing filter directive
pub const LOG_ENV_VAR: &str = "EDITOR_BRIDGE_LOG";

const LOG_FILE_PREFIX: &str = "editor-bridge.log";

const DEFAULT_FILTER: &str = "editor_bridge=info,bridge_core=info,bridge_peer=info,warn";

/// Initialize the diagnostic logging subsystem
///
/// Logs are written to `<data-local-dir>/editor-bridge/logs/`, never to the
/// console, so they do not mix with the user-facing log facade.
///
/// # Examples
/// ```bash
/// EDITOR_BRIDGE_LOG=debug open-at-location src/index.js:42
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory();
    std::fs::create_dir_all(&log_dir).with_wrap_err(ErrorCode::LoggingInit, || {
        format!("Failed to create log directory {}", log_dir.display())
    })?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(&log_dir)
        .with_wrap_err(ErrorCode::LoggingInit, || {
            format!("Failed to open log file in {}", log_dir.display())
        })?;

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()
        .map_err(|e| {
            InternalError::wrap(e, ErrorCode::LoggingInit, "Failed to install tracing subscriber")
        })?;

    tracing::info!("editor-bridge starting");
    tracing::info!("Log directory: {}", log_dir.display());

    Ok(())
}

/// Get the log directory path
pub fn get_log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("editor-bridge").join("logs")
}

/// Get the log file path for the current day
///
/// The daily appender suffixes the file name with the UTC date.
pub fn get_current_log_file() -> PathBuf {
    get_log_directory().join(format!(
        "{}.{}",
        LOG_FILE_PREFIX,
        Utc::now().format("%Y-%m-%d")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_paths() {
        let dir = get_log_directory();
        assert!(dir.ends_with("editor-bridge/logs"));
        let file = get_current_log_file();
        assert_eq!(file.parent(), Some(dir.as_path()));
        assert!(file
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("editor-bridge.log."));
    }

    #[cfg(target_os = "linux")]
    #[test]
    #[serial_test::serial]
    fn test_unopenable_log_file_is_logging_init_error() {
        let data_home = tempfile::tempdir().unwrap();
        let previous = std::env::var_os("XDG_DATA_HOME");
        std::env::set_var("XDG_DATA_HOME", data_home.path());

        // A directory where today's log file should go cannot be opened for appending.
        std::fs::create_dir_all(get_current_log_file()).unwrap();
        let result = init();

        match previous {
            Some(value) => std::env::set_var("XDG_DATA_HOME", value),
            None => std::env::remove_var("XDG_DATA_HOME"),
        }

        let err = result.unwrap_err();
        assert_eq!(err.code(), ErrorCode::LoggingInit);
        assert!(err.is_recoverable());
        assert!(err.inner().is_some());
    }
}

//! User-facing log facade
//!
//! A [`LogHub`] owns one active [`Logger`] backend and a verbosity threshold.
//! Components can hold a hub explicitly, or use the process-wide hub through
//! the free functions in this module ([`log_message`], [`log_error`], ...).
//!
//! The global backend is meant to be installed once at startup with
//! [`set_global_logger`]. Swapping it later is memory-safe, but messages
//! already delivered to the old backend are never redelivered.
//!
//! Internal diagnostics of editor-bridge itself go through `tracing`; this
//! facade is the channel the user actually reads.

use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::command_status::{command_status_string, CommandStatus};
use crate::error::{render_error_chain, ErrorCode, InternalError};
use crate::loggers::{ConsoleLogger, StreamLogger};

// ─────────────────────────────────────────────────────────────────────────────
// Levels and streams
// ─────────────────────────────────────────────────────────────────────────────

/// Log severity, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    #[default]
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Whether a message at `self` passes a hub configured with `threshold`.
    pub fn is_enabled_at(&self, threshold: LogLevel) -> bool {
        *self <= threshold
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = InternalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" | "verbose" => Ok(LogLevel::Trace),
            other => Err(InternalError::new(
                ErrorCode::InvalidArgument,
                format!("Unknown log level: {}", other),
            )),
        }
    }
}

/// Identifies which output stream a chunk of raw data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl fmt::Display for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputStream::Stdout => write!(f, "stdout"),
            OutputStream::Stderr => write!(f, "stderr"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend capability set
// ─────────────────────────────────────────────────────────────────────────────

/// A destination for user-facing log output.
///
/// Only [`Logger::log_message`] and [`Logger::log_error`] are required; the
/// other capabilities fall back to plain messages or no-ops.
pub trait Logger: Send + Sync {
    /// Log a plain message. `format` asks for backend decoration (timestamps,
    /// prefixes); backends without decoration ignore it.
    fn log_message(&self, message: &str, format: bool);

    /// Log an error. `display` is already derived from `error` (including the
    /// cause chain when `log_stack` is set); the raw error is passed along for
    /// backends that render it themselves.
    fn log_error(&self, display: &str, error: &(dyn StdError + 'static), log_stack: bool);

    /// Log a diagnostic message that already passed the level filter.
    fn log_internal_message(&self, level: LogLevel, message: &str) {
        self.log_message(&format!("[Internal-{}] {}", level, message), true);
    }

    /// Forward a raw chunk of process output.
    fn log_stream_data(&self, data: &[u8], _stream: OutputStream) {
        self.log_message(&String::from_utf8_lossy(data), false);
    }

    /// Bring the output channel to the user's attention.
    fn set_focus_on_log_channel(&self) {}
}

/// Derive the display string for an error.
///
/// With `log_stack`, every cause in the `source()` chain is appended.
pub fn error_string(error: &(dyn StdError + 'static), log_stack: bool) -> String {
    if log_stack {
        render_error_chain(error)
    } else {
        error.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LogHub
// ─────────────────────────────────────────────────────────────────────────────

/// One active backend plus a verbosity threshold
pub struct LogHub {
    backend: RwLock<Arc<dyn Logger>>,
    threshold: AtomicU8,
}

impl fmt::Debug for LogHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogHub")
            .field("backend", &"<logger>")
            .field("threshold", &self.threshold())
            .finish()
    }
}

impl Default for LogHub {
    fn default() -> Self {
        Self::new(Arc::new(ConsoleLogger::new()), LogLevel::default())
    }
}

impl LogHub {
    pub fn new(backend: Arc<dyn Logger>, threshold: LogLevel) -> Self {
        Self {
            backend: RwLock::new(backend),
            threshold: AtomicU8::new(threshold as u8),
        }
    }

    /// Replace the active backend. Takes effect for every later call.
    pub fn set_backend(&self, backend: Arc<dyn Logger>) {
        let mut guard = self.backend.write().unwrap_or_else(PoisonError::into_inner);
        *guard = backend;
    }

    /// The backend currently receiving messages
    pub fn backend(&self) -> Arc<dyn Logger> {
        self.backend
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn threshold(&self) -> LogLevel {
        LogLevel::from_u8(self.threshold.load(Ordering::Relaxed))
    }

    pub fn set_threshold(&self, threshold: LogLevel) {
        self.threshold.store(threshold as u8, Ordering::Relaxed);
    }

    pub fn log_message(&self, message: &str, format: bool) {
        self.backend().log_message(message, format);
    }

    pub fn log_error(&self, error: &(dyn StdError + 'static), log_stack: bool) {
        let display = error_string(error, log_stack);
        self.backend().log_error(&display, error, log_stack);
    }

    /// Warnings share the error channel and are never dropped.
    pub fn log_warning(&self, error: &(dyn StdError + 'static), log_stack: bool) {
        self.log_error(error, log_stack);
    }

    /// Emitted only when `level` passes the threshold; otherwise the backend
    /// is not touched at all.
    pub fn log_internal_message(&self, level: LogLevel, message: &str) {
        if level.is_enabled_at(self.threshold()) {
            self.backend().log_internal_message(level, message);
        }
    }

    pub fn log_command_status(&self, command: &str, status: CommandStatus) {
        let line = command_status_string(command, status);
        self.backend().log_message(&line, true);
    }

    pub fn log_stream_data(&self, data: &[u8], stream: OutputStream) {
        self.backend().log_stream_data(data, stream);
    }

    pub fn set_focus_on_log_channel(&self) {
        self.backend().set_focus_on_log_channel();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Process-wide hub
// ─────────────────────────────────────────────────────────────────────────────

static GLOBAL_HUB: LazyLock<LogHub> = LazyLock::new(LogHub::default);

/// The process-wide hub, defaulting to a [`ConsoleLogger`] at `Info`.
pub fn global() -> &'static LogHub {
    &GLOBAL_HUB
}

/// Install the process-wide backend. Call from startup, not from running tasks.
pub fn set_global_logger(backend: Arc<dyn Logger>) {
    global().set_backend(backend);
}

pub fn set_global_threshold(threshold: LogLevel) {
    global().set_threshold(threshold);
}

pub fn log_message(message: &str) {
    global().log_message(message, true);
}

pub fn log_error(error: &(dyn StdError + 'static)) {
    global().log_error(error, true);
}

pub fn log_warning(error: &(dyn StdError + 'static)) {
    global().log_warning(error, true);
}

pub fn log_internal_message(level: LogLevel, message: &str) {
    global().log_internal_message(level, message);
}

pub fn log_command_status(command: &str, status: CommandStatus) {
    global().log_command_status(command, status);
}

pub fn log_stream_data(data: &[u8], stream: OutputStream) {
    global().log_stream_data(data, stream);
}

pub fn set_focus_on_log_channel() {
    global().set_focus_on_log_channel();
}

/// Log a message to a specific backend, bypassing the hub.
pub fn log_with_logger(logger: &dyn Logger, message: &str, format: bool) {
    logger.log_message(message, format);
}

/// Write a message straight to stderr regardless of the active backend.
pub fn log_to_stderr(message: &str, format: bool) {
    StreamLogger::new(std::io::stderr()).log_message(message, format);
}

/// Write a message straight to stdout regardless of the active backend.
pub fn log_to_stdout(message: &str, format: bool) {
    StreamLogger::new(std::io::stdout()).log_message(message, format);
}

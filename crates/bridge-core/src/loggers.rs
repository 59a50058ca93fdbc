//! Concrete [`Logger`] backends
//!
//! - [`StreamLogger`] / [`ConsoleLogger`] write text to a stream or the console
//! - [`TracingLogger`] turns every capability into a structured `tracing` event
//! - [`ChannelLogger`] forwards [`LogRecord`]s to an async receiver
//! - [`NullLogger`] discards everything

use std::error::Error as StdError;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use chrono::Local;
use tokio::sync::mpsc;

use crate::log::{LogLevel, Logger, OutputStream};

fn decorate(message: &str, format: bool) -> String {
    if format {
        format!("[{}] {}", Local::now().format("%H:%M:%S"), message)
    } else {
        message.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stream / Console
// ─────────────────────────────────────────────────────────────────────────────

/// Writes every message as a line to a single stream.
///
/// Write failures are swallowed: logging must never turn into an error path.
pub struct StreamLogger<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> StreamLogger<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_line(&self, line: &str) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(writer, "{}", line);
        let _ = writer.flush();
    }

    fn write_raw(&self, data: &[u8]) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writer.write_all(data);
        let _ = writer.flush();
    }
}

impl<W: Write + Send> Logger for StreamLogger<W> {
    fn log_message(&self, message: &str, format: bool) {
        self.write_line(&decorate(message, format));
    }

    fn log_error(&self, display: &str, _error: &(dyn StdError + 'static), _log_stack: bool) {
        self.write_line(&decorate(&format!("Error: {}", display), true));
    }

    fn log_stream_data(&self, data: &[u8], _stream: OutputStream) {
        self.write_raw(data);
    }
}

/// Messages to stdout, errors to stderr, stream data to the matching stream
pub struct ConsoleLogger {
    stdout: StreamLogger<io::Stdout>,
    stderr: StreamLogger<io::Stderr>,
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self {
            stdout: StreamLogger::new(io::stdout()),
            stderr: StreamLogger::new(io::stderr()),
        }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for ConsoleLogger {
    fn log_message(&self, message: &str, format: bool) {
        self.stdout.log_message(message, format);
    }

    fn log_error(&self, display: &str, error: &(dyn StdError + 'static), log_stack: bool) {
        self.stderr.log_error(display, error, log_stack);
    }

    fn log_stream_data(&self, data: &[u8], stream: OutputStream) {
        match stream {
            OutputStream::Stdout => self.stdout.log_stream_data(data, stream),
            OutputStream::Stderr => self.stderr.log_stream_data(data, stream),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tracing
// ─────────────────────────────────────────────────────────────────────────────

/// Structured backend: every call becomes a `tracing` event under the
/// `editor_bridge::output` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log_message(&self, message: &str, format: bool) {
        tracing::info!(target: "editor_bridge::output", format, "{}", message);
    }

    fn log_error(&self, rendered: &str, error: &(dyn StdError + 'static), log_stack: bool) {
        tracing::error!(
            target: "editor_bridge::output",
            error = %error,
            log_stack,
            "{}",
            rendered
        );
    }

    fn log_internal_message(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => tracing::error!(target: "editor_bridge::internal", "{}", message),
            LogLevel::Warn => tracing::warn!(target: "editor_bridge::internal", "{}", message),
            LogLevel::Info => tracing::info!(target: "editor_bridge::internal", "{}", message),
            LogLevel::Debug => tracing::debug!(target: "editor_bridge::internal", "{}", message),
            LogLevel::Trace => tracing::trace!(target: "editor_bridge::internal", "{}", message),
        }
    }

    fn log_stream_data(&self, data: &[u8], stream: OutputStream) {
        tracing::info!(
            target: "editor_bridge::stream",
            stream = %stream,
            bytes = data.len(),
            "{}",
            String::from_utf8_lossy(data).trim_end()
        );
    }

    fn set_focus_on_log_channel(&self) {
        tracing::trace!(target: "editor_bridge::output", "focus requested");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Channel
// ─────────────────────────────────────────────────────────────────────────────

/// One call made against a [`ChannelLogger`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    Message { message: String, format: bool },
    Error { display: String, log_stack: bool },
    Internal { level: LogLevel, message: String },
    Stream { stream: OutputStream, data: Vec<u8> },
    Focus,
}

/// Forwards every call as a [`LogRecord`] to an unbounded receiver.
///
/// Records sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelLogger {
    tx: mpsc::UnboundedSender<LogRecord>,
}

impl ChannelLogger {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LogRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, record: LogRecord) {
        let _ = self.tx.send(record);
    }
}

impl Logger for ChannelLogger {
    fn log_message(&self, message: &str, format: bool) {
        self.send(LogRecord::Message {
            message: message.to_string(),
            format,
        });
    }

    fn log_error(&self, display: &str, _error: &(dyn StdError + 'static), log_stack: bool) {
        self.send(LogRecord::Error {
            display: display.to_string(),
            log_stack,
        });
    }

    fn log_internal_message(&self, level: LogLevel, message: &str) {
        self.send(LogRecord::Internal {
            level,
            message: message.to_string(),
        });
    }

    fn log_stream_data(&self, data: &[u8], stream: OutputStream) {
        self.send(LogRecord::Stream {
            stream,
            data: data.to_vec(),
        });
    }

    fn set_focus_on_log_channel(&self) {
        self.send(LogRecord::Focus);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Null
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log_message(&self, _message: &str, _format: bool) {}

    fn log_error(&self, _display: &str, _error: &(dyn StdError + 'static), _log_stack: bool) {}

    fn log_internal_message(&self, _level: LogLevel, _message: &str) {}

    fn log_stream_data(&self, _data: &[u8], _stream: OutputStream) {}
}

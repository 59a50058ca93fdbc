//! Tagged error type with an explicit cause chain
//!
//! Every failure in editor-bridge is an [`InternalError`]: an [`ErrorCode`]
//! for programmatic handling, a human-readable message, and an optional inner
//! cause. Layers that catch a lower-level failure wrap it exactly once with
//! [`InternalError::wrap`] (or [`ResultExt::wrap_err`]), so the outermost
//! message is what the user sees while [`InternalError::render_chain`] still
//! reaches the root cause.

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, InternalError>;

/// Boxed cause stored inside an [`InternalError`]
pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Failure categories, independent of the human-readable message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // ─────────────────────────────────────────────────────────────
    // Workspace resolution
    // ─────────────────────────────────────────────────────────────
    /// No ancestor directory is a project root, or the search itself failed
    WorkspaceNotFound,
    /// The project-detection predicate could not inspect a directory
    ProjectDetectionFailed,

    // ─────────────────────────────────────────────────────────────
    // Remote dispatch
    // ─────────────────────────────────────────────────────────────
    /// A command sent to the editor peer could not be completed
    CommandFailed,
    /// The peer's endpoint could not be reached
    PeerConnectionFailed,
    /// The peer answered with something we could not understand
    PeerProtocol,
    /// The peer understood the request and refused it
    PeerRejected,

    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure
    // ─────────────────────────────────────────────────────────────
    InvalidArgument,
    ConfigInvalid,
    LoggingInit,
    Io,
    Json,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::WorkspaceNotFound => "WorkspaceNotFound",
            ErrorCode::ProjectDetectionFailed => "ProjectDetectionFailed",
            ErrorCode::CommandFailed => "CommandFailed",
            ErrorCode::PeerConnectionFailed => "PeerConnectionFailed",
            ErrorCode::PeerProtocol => "PeerProtocol",
            ErrorCode::PeerRejected => "PeerRejected",
            ErrorCode::InvalidArgument => "InvalidArgument",
            ErrorCode::ConfigInvalid => "ConfigInvalid",
            ErrorCode::LoggingInit => "LoggingInit",
            ErrorCode::Io => "Io",
            ErrorCode::Json => "Json",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tagged failure carrying an optional inner cause
#[derive(Debug, Error)]
#[error("{message}")]
pub struct InternalError {
    code: ErrorCode,
    message: String,
    #[source]
    inner: Option<BoxedCause>,
}

// ─────────────────────────────────────────────────────────────────
// Construction
// ─────────────────────────────────────────────────────────────────

impl InternalError {
    /// Create a root-cause error with no inner error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            inner: None,
        }
    }

    /// Wrap a lower-level failure, keeping it as the inner cause.
    pub fn wrap(cause: impl Into<BoxedCause>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            inner: Some(cause.into()),
        }
    }

    pub fn workspace_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::WorkspaceNotFound, message)
    }

    pub fn command_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CommandFailed, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    pub fn peer_connection(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PeerConnectionFailed, message)
    }

    pub fn peer_protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PeerProtocol, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }
}

// ─────────────────────────────────────────────────────────────────
// Inspection
// ─────────────────────────────────────────────────────────────────

impl InternalError {
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.inner.as_deref()
    }

    /// Iterate over this error and every cause beneath it, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> {
        let mut next: Option<&(dyn StdError + 'static)> = Some(self);
        std::iter::from_fn(move || {
            let current = next?;
            next = current.source();
            Some(current)
        })
    }

    /// Codes of every [`InternalError`] in the chain, outermost first.
    pub fn codes(&self) -> Vec<ErrorCode> {
        self.chain()
            .filter_map(|e| e.downcast_ref::<InternalError>())
            .map(InternalError::code)
            .collect()
    }

    /// Whether any frame of the chain carries `code`.
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.codes().contains(&code)
    }

    /// Render the full chain for diagnostics.
    pub fn render_chain(&self) -> String {
        render_error_chain(self)
    }

    /// Check if the caller may carry on after logging this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self.code, ErrorCode::ConfigInvalid | ErrorCode::LoggingInit)
    }
}

/// Render any error followed by its `source()` chain, one frame per line.
pub fn render_error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        out.push_str("\n  caused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

// ─────────────────────────────────────────────────────────────────
// Conversions
// ─────────────────────────────────────────────────────────────────

impl From<std::io::Error> for InternalError {
    fn from(err: std::io::Error) -> Self {
        let message = format!("IO error: {}", err);
        Self::wrap(err, ErrorCode::Io, message)
    }
}

impl From<serde_json::Error> for InternalError {
    fn from(err: serde_json::Error) -> Self {
        let message = format!("JSON parsing error: {}", err);
        Self::wrap(err, ErrorCode::Json, message)
    }
}

impl From<toml::de::Error> for InternalError {
    fn from(err: toml::de::Error) -> Self {
        let message = format!("Invalid configuration: {}", err);
        Self::wrap(err, ErrorCode::ConfigInvalid, message)
    }
}

// ─────────────────────────────────────────────────────────────────
// Result Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for wrapping errors with one more diagnostic frame
pub trait ResultExt<T> {
    /// Wrap the error as `code` with `message`
    fn wrap_err(self, code: ErrorCode, message: impl Into<String>) -> Result<T>;

    /// Wrap with a lazily built message
    fn with_wrap_err<F>(self, code: ErrorCode, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<BoxedCause>,
{
    fn wrap_err(self, code: ErrorCode, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| InternalError::wrap(e, code, message))
    }

    fn with_wrap_err<F>(self, code: ErrorCode, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| InternalError::wrap(e, code, f()))
    }
}

//! # bridge-core - Core Domain Types
//!
//! Foundation crate for editor-bridge. Provides the tagged error type, the
//! user-facing log facade and its backends, command status reporting,
//! settings, project detection and workspace location.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing, tokio, toml).
//!
//! ## Public API
//!
//! ### Error Handling (`error`)
//! - [`InternalError`] - Error code + message + optional inner cause
//! - [`ErrorCode`] - Failure categories (`WorkspaceNotFound`, `CommandFailed`, ...)
//! - [`Result`] - Type alias for `std::result::Result<T, InternalError>`
//! - [`ResultExt`] - Wrap an error with one more diagnostic frame
//!
//! ### Log Facade (`log`, `loggers`)
//! - [`LogHub`] - One active [`Logger`] backend plus a verbosity threshold
//! - [`LogLevel`], [`OutputStream`]
//! - [`ConsoleLogger`], [`StreamLogger`], [`TracingLogger`], [`ChannelLogger`], [`NullLogger`]
//!
//! ### Command Status (`command_status`)
//! - [`CommandStatus`], [`command_status_string()`]
//!
//! ### Workspace Location (`discovery`, `locator`)
//! - [`ProjectDetector`] - Async "is this a project root" predicate
//! - [`PackageJsonDetector`] - `package.json` dependency check
//! - [`locate_workspace()`] - Nearest project root owning a file
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use bridge_core::prelude::*;
//! ```

pub mod command_status;
pub mod config;
pub mod discovery;
pub mod error;
pub mod locator;
pub mod log;
pub mod loggers;
pub mod logging;
pub mod prelude;

// Re-export commonly used types at crate root for convenience
pub use command_status::{command_status_string, CommandStatus};
pub use config::{load_settings, DetectionSettings, LogSettings, PeerSettings, Settings};
pub use discovery::{LocalProjectDetector, PackageJsonDetector, PackageManifest, ProjectDetector};
pub use error::{render_error_chain, BoxedCause, ErrorCode, InternalError, Result, ResultExt};
pub use locator::{locate_workspace, parent_dir};
pub use log::{LogHub, LogLevel, Logger, OutputStream};
pub use loggers::{ChannelLogger, ConsoleLogger, LogRecord, NullLogger, StreamLogger, TracingLogger};

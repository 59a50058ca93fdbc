//! Prelude for common imports used throughout all editor-bridge crates

pub use crate::error::{ErrorCode, InternalError, Result, ResultExt};
pub use tracing::{debug, error, info, instrument, trace, warn};

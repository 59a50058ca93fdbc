//! editor-bridge Library
//!
//! Opens a file in the editor instance that owns its project: the file's
//! project root is located by walking up its ancestors, then the editor peer
//! for that root is asked to open the file at a line.

pub mod target;

pub use target::{normalize_path, FileTarget};

use std::path::PathBuf;

use bridge_core::log::{LogHub, LogLevel};
use bridge_core::prelude::*;
use bridge_core::{locate_workspace, CommandStatus, LocalProjectDetector};
use bridge_peer::PeerFactory;

/// Command name reported in status lines
pub const OPEN_FILE_COMMAND: &str = "openFileAtLocation";

/// Locate the project root owning `target` and ask its editor to open it.
///
/// Returns the resolved project root. Failures are either
/// [`ErrorCode::WorkspaceNotFound`] or [`ErrorCode::CommandFailed`], each
/// carrying the full cause chain.
pub async fn open_file_at_location<D, F>(
    target: &FileTarget,
    detector: &D,
    factory: &F,
    log: &LogHub,
) -> Result<PathBuf>
where
    D: LocalProjectDetector,
    F: PeerFactory,
{
    log.log_command_status(OPEN_FILE_COMMAND, CommandStatus::Start);

    let project_root = locate_workspace(&target.path, detector).await?;
    log.log_internal_message(
        LogLevel::Debug,
        &format!("Resolved project root: {}", project_root.display()),
    );

    bridge_peer::open_file_at_location(factory, &project_root, &target.path, Some(target.line))
        .await?;

    log.log_command_status(OPEN_FILE_COMMAND, CommandStatus::End);
    Ok(project_root)
}

/// Report a failed run.
///
/// The hub gets the outermost message only; the returned report carries the
/// whole cause chain for the final render.
pub fn report_failure(err: InternalError, log: &LogHub) -> color_eyre::eyre::Report {
    error!("open-at-location failed: {}", err.render_chain());
    log.log_error(&err, false);
    color_eyre::eyre::Report::new(err)
}

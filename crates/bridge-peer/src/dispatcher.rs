//! Dispatch of editor commands to the peer owning a project root

use std::path::Path;

use bridge_core::prelude::*;

use crate::peer::{LocalPeerHandle, PeerFactory};

/// Line used when the caller does not name one
pub const DEFAULT_LINE: u32 = 1;

/// Message shown to the user when the editor could not act on a command
pub const PEER_UNREACHABLE_HINT: &str =
    "Unable to communicate with the editor. Please make sure it is open in the appropriate workspace.";

/// Ask the editor owning `project_root` to open `file` at `line`.
///
/// Exactly one request is made; there is no retry. Any failure is wrapped as
/// [`ErrorCode::CommandFailed`] with the peer's error kept as the cause.
pub async fn open_file_at_location<F>(
    factory: &F,
    project_root: &Path,
    file: &Path,
    line: Option<u32>,
) -> Result<()>
where
    F: PeerFactory,
{
    let line = line.unwrap_or(DEFAULT_LINE).max(1);
    let peer = factory.peer_for_root(project_root);

    info!(
        "Opening {}:{} in editor for {}",
        file.display(),
        line,
        project_root.display()
    );

    peer.open_file_at_location(file, line)
        .await
        .wrap_err(ErrorCode::CommandFailed, PEER_UNREACHABLE_HINT)
}

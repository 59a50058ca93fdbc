//! Peer handle and factory contracts
//!
//! A peer is the editor instance that owns a project root. The dispatcher
//! only needs two things from the outside world: a way to get the peer for a
//! root ([`PeerFactory`]) and a way to ask that peer to open a file
//! ([`PeerHandle`]). How the bytes travel is up to the implementation.

use std::path::Path;

use bridge_core::prelude::*;

/// Handle to the editor instance owning one project root
#[trait_variant::make(PeerHandle: Send)]
pub trait LocalPeerHandle {
    /// Ask the peer to open `file` at the 1-based `line`.
    async fn open_file_at_location(&self, file: &Path, line: u32) -> Result<()>;
}

/// Produces the peer handle for a project root.
///
/// Obtaining a handle never fails; connection problems surface when a
/// request is made.
pub trait PeerFactory {
    type Peer: LocalPeerHandle;

    fn peer_for_root(&self, project_root: &Path) -> Self::Peer;
}

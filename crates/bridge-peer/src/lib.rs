//! # bridge-peer - Editor Peer Dispatch
//!
//! Talks to the editor instance that owns a project root.
//!
//! ## Public API
//!
//! - [`PeerHandle`] / [`PeerFactory`] - Contract between the dispatcher and a transport
//! - [`open_file_at_location()`] - Send one "open file" request, wrapping failures as `CommandFailed`
//! - [`SocketPeerFactory`], [`SocketPeer`] - Unix-domain socket transport
//! - [`ExtensionMessage`], [`PeerRequest`], [`PeerResponse`] - Line-delimited JSON wire format

pub mod dispatcher;
pub mod peer;
pub mod protocol;
pub mod socket;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use dispatcher::{open_file_at_location, DEFAULT_LINE, PEER_UNREACHABLE_HINT};
pub use peer::{LocalPeerHandle, PeerFactory, PeerHandle};
pub use protocol::{next_request_id, ExtensionMessage, PeerRequest, PeerResponse};
pub use socket::{socket_path_for_root, SocketPeer, SocketPeerFactory};

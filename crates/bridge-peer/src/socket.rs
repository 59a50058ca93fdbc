//! Unix-domain socket transport to the editor peer
//!
//! Every project root maps to one socket file,
//! `<socket_dir>/editor-bridge-<hash>.sock`, where `<hash>` is derived from
//! the root path. The editor side listens there while the workspace is open.
//! One request is one connection: connect, write a line, read a line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sha2::{Digest, Sha256};

use bridge_core::config::PeerSettings;
use bridge_core::prelude::*;

use crate::peer::{LocalPeerHandle, PeerFactory};
use crate::protocol::{next_request_id, ExtensionMessage, PeerResponse};

/// File name prefix of every peer socket
pub const SOCKET_PREFIX: &str = "editor-bridge-";

const HASH_LEN: usize = 16;

/// Socket path of the peer that owns `project_root`
pub fn socket_path_for_root(socket_dir: &Path, project_root: &Path) -> PathBuf {
    let digest = Sha256::digest(project_root.to_string_lossy().as_bytes());
    let hash = format!("{:x}", digest);
    socket_dir.join(format!("{}{}.sock", SOCKET_PREFIX, &hash[..HASH_LEN]))
}

/// Creates [`SocketPeer`]s under one socket directory
#[derive(Debug, Clone)]
pub struct SocketPeerFactory {
    socket_dir: PathBuf,
    timeout: Duration,
}

impl SocketPeerFactory {
    pub fn new(socket_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            socket_dir: socket_dir.into(),
            timeout,
        }
    }

    pub fn from_settings(settings: &PeerSettings) -> Self {
        Self::new(settings.resolved_socket_dir(), settings.timeout())
    }

    pub fn socket_dir(&self) -> &Path {
        &self.socket_dir
    }
}

impl PeerFactory for SocketPeerFactory {
    type Peer = SocketPeer;

    fn peer_for_root(&self, project_root: &Path) -> SocketPeer {
        SocketPeer::new(
            socket_path_for_root(&self.socket_dir, project_root),
            self.timeout,
        )
    }
}

/// Peer reached through a Unix-domain socket
#[derive(Debug, Clone)]
pub struct SocketPeer {
    socket_path: PathBuf,
    timeout: Duration,
}

impl SocketPeer {
    pub fn new(socket_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout,
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send one message and wait for its response.
    ///
    /// The whole round trip (connect, write, read) is bounded by the peer
    /// timeout. A response with `ok: false` is returned as
    /// [`ErrorCode::PeerRejected`].
    pub async fn send(&self, message: &ExtensionMessage) -> Result<PeerResponse> {
        let id = next_request_id();
        let line = message.build(id);

        debug!(
            "Sending request #{} ({}) to {:?}",
            id,
            message.description(),
            self.socket_path
        );

        let response = match tokio::time::timeout(self.timeout, self.round_trip(&line)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(InternalError::peer_connection(format!(
                    "Request '{}' timed out after {:?}",
                    message.description(),
                    self.timeout
                )));
            }
        };

        if response.id != id {
            return Err(InternalError::peer_protocol(format!(
                "Response id {} does not match request id {}",
                response.id, id
            )));
        }

        if !response.ok {
            let reason = response
                .error
                .clone()
                .unwrap_or_else(|| "no reason given".to_string());
            return Err(InternalError::new(
                ErrorCode::PeerRejected,
                format!("Editor rejected '{}': {}", message.description(), reason),
            ));
        }

        debug!("Request #{} completed", id);
        Ok(response)
    }

    #[cfg(unix)]
    async fn round_trip(&self, line: &str) -> Result<PeerResponse> {
        use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
        use tokio::net::UnixStream;

        let stream = UnixStream::connect(&self.socket_path)
            .await
            .with_wrap_err(ErrorCode::PeerConnectionFailed, || {
                format!("Failed to connect to editor at {}", self.socket_path.display())
            })?;
        let (read_half, mut write_half) = stream.into_split();

        let mut request = String::with_capacity(line.len() + 1);
        request.push_str(line);
        request.push('\n');
        write_half
            .write_all(request.as_bytes())
            .await
            .wrap_err(ErrorCode::PeerConnectionFailed, "Failed to send request to editor")?;
        write_half
            .flush()
            .await
            .wrap_err(ErrorCode::PeerConnectionFailed, "Failed to send request to editor")?;

        let mut reader = BufReader::new(read_half);
        let mut response = String::new();
        let read = reader
            .read_line(&mut response)
            .await
            .wrap_err(ErrorCode::PeerConnectionFailed, "Failed to read response from editor")?;

        if read == 0 {
            return Err(InternalError::peer_protocol(
                "Editor closed the connection without responding",
            ));
        }

        PeerResponse::parse(response.trim_end())
    }

    #[cfg(not(unix))]
    async fn round_trip(&self, _line: &str) -> Result<PeerResponse> {
        Err(InternalError::peer_connection(
            "Editor sockets are only supported on Unix platforms",
        ))
    }
}

impl LocalPeerHandle for SocketPeer {
    async fn open_file_at_location(&self, file: &Path, line: u32) -> Result<()> {
        let message = ExtensionMessage::OpenFileAtLocation {
            file: file.to_path_buf(),
            line,
        };
        self.send(&message).await.map(|_| ())
    }
}

//! Test utilities for peer dispatch
//!
//! - [`SpyPeerFactory`] records every open request in memory and can be told
//!   to fail like an unreachable editor.
//! - [`FakeEditorServer`] (Unix only) listens on a real socket and answers
//!   requests with a scripted [`Reply`].

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use bridge_core::prelude::*;

use crate::peer::{LocalPeerHandle, PeerFactory};

/// One request observed by a [`SpyPeer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub project_root: PathBuf,
    pub file: PathBuf,
    pub line: u32,
}

/// Factory whose peers record requests instead of sending them
#[derive(Debug, Clone, Default)]
pub struct SpyPeerFactory {
    requests: Arc<Mutex<Vec<OpenRequest>>>,
    failure: Option<String>,
}

impl SpyPeerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request fails with a connection error carrying `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<OpenRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PeerFactory for SpyPeerFactory {
    type Peer = SpyPeer;

    fn peer_for_root(&self, project_root: &Path) -> SpyPeer {
        SpyPeer {
            project_root: project_root.to_path_buf(),
            requests: self.requests.clone(),
            failure: self.failure.clone(),
        }
    }
}

/// Peer handed out by [`SpyPeerFactory`]
#[derive(Debug, Clone)]
pub struct SpyPeer {
    project_root: PathBuf,
    requests: Arc<Mutex<Vec<OpenRequest>>>,
    failure: Option<String>,
}

impl LocalPeerHandle for SpyPeer {
    async fn open_file_at_location(&self, file: &Path, line: u32) -> Result<()> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(OpenRequest {
                project_root: self.project_root.clone(),
                file: file.to_path_buf(),
                line,
            });

        match &self.failure {
            Some(reason) => Err(InternalError::wrap(
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, reason.clone()),
                ErrorCode::PeerConnectionFailed,
                "Failed to connect to editor",
            )),
            None => Ok(()),
        }
    }
}

#[cfg(unix)]
pub use server::{FakeEditorServer, Reply};

#[cfg(unix)]
mod server {
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::{UnixListener, UnixStream};
    use tokio::sync::Mutex;
    use tokio::task::JoinHandle;

    use crate::protocol::{ExtensionMessage, PeerRequest, PeerResponse};

    /// How the fake editor answers each request
    #[derive(Debug, Clone)]
    pub enum Reply {
        Ok,
        Reject(String),
        Garbage,
        WrongId,
        Hangup,
        Silent,
    }

    /// Socket server standing in for an editor.
    ///
    /// Must be started inside a tokio runtime. The accept loop is aborted on
    /// drop.
    pub struct FakeEditorServer {
        received: Arc<Mutex<Vec<ExtensionMessage>>>,
        task: JoinHandle<()>,
    }

    impl FakeEditorServer {
        pub fn start(socket_path: &Path, reply: Reply) -> std::io::Result<Self> {
            let listener = UnixListener::bind(socket_path)?;
            let received = Arc::new(Mutex::new(Vec::new()));
            let task = tokio::spawn(serve(listener, reply, received.clone()));
            Ok(Self { received, task })
        }

        /// Messages decoded so far, in arrival order
        pub async fn received(&self) -> Vec<ExtensionMessage> {
            self.received.lock().await.clone()
        }
    }

    impl Drop for FakeEditorServer {
        fn drop(&mut self) {
            self.task.abort();
        }
    }

    async fn serve(
        listener: UnixListener,
        reply: Reply,
        received: Arc<Mutex<Vec<ExtensionMessage>>>,
    ) {
        while let Ok((stream, _)) = listener.accept().await {
            handle_connection(stream, &reply, &received).await;
        }
    }

    async fn handle_connection(
        stream: UnixStream,
        reply: &Reply,
        received: &Mutex<Vec<ExtensionMessage>>,
    ) {
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        let mut line = String::new();
        if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
            return;
        }

        let Ok(request) = PeerRequest::parse(line.trim_end()) else {
            return;
        };
        if let Ok(message) = request.to_message() {
            received.lock().await.push(message);
        }

        let response = match reply {
            Reply::Ok => PeerResponse::success(request.id).to_line(),
            Reply::Reject(reason) => PeerResponse::error(request.id, reason.clone()).to_line(),
            Reply::Garbage => "this is not json".to_string(),
            Reply::WrongId => PeerResponse::success(request.id + 1).to_line(),
            Reply::Hangup => return,
            Reply::Silent => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                return;
            }
        };

        let _ = write_half.write_all(format!("{}\n", response).as_bytes()).await;
        let _ = write_half.flush().await;
    }
}

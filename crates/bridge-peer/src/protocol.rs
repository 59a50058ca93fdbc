//! Wire protocol spoken with the editor peer
//!
//! One JSON object per line in each direction:
//!
//! ```text
//! -> {"id":7,"message":"openFileAtLocation","args":["/ws/app/src/index.js",42]}
//! <- {"id":7,"ok":true}
//! <- {"id":7,"ok":false,"error":"workspace not open"}
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use bridge_core::prelude::*;

/// Global request ID counter
static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique request ID
pub fn next_request_id() -> u64 {
    REQUEST_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Method name of the open-file request
pub const OPEN_FILE_AT_LOCATION: &str = "openFileAtLocation";

/// Commands understood by the editor peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionMessage {
    /// Open `file` and reveal the 1-based `line`
    OpenFileAtLocation { file: PathBuf, line: u32 },
}

impl ExtensionMessage {
    pub fn method(&self) -> &'static str {
        match self {
            ExtensionMessage::OpenFileAtLocation { .. } => OPEN_FILE_AT_LOCATION,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ExtensionMessage::OpenFileAtLocation { .. } => "open file at location",
        }
    }

    fn args(&self) -> Vec<Value> {
        match self {
            ExtensionMessage::OpenFileAtLocation { file, line } => {
                vec![json!(file.to_string_lossy()), json!(line)]
            }
        }
    }

    /// Build the request line (without the trailing newline)
    pub fn build(&self, id: u64) -> String {
        json!({
            "id": id,
            "message": self.method(),
            "args": self.args(),
        })
        .to_string()
    }
}

/// A request as it travels on the wire
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PeerRequest {
    pub id: u64,
    pub message: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl PeerRequest {
    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line).wrap_err(ErrorCode::PeerProtocol, "Malformed peer request")
    }

    /// Decode the typed message carried by this request
    pub fn to_message(&self) -> Result<ExtensionMessage> {
        match self.message.as_str() {
            OPEN_FILE_AT_LOCATION => {
                let file = self
                    .args
                    .first()
                    .and_then(Value::as_str)
                    .ok_or_else(|| InternalError::peer_protocol("openFileAtLocation: missing file"))?;
                let line = self
                    .args
                    .get(1)
                    .and_then(Value::as_u64)
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| InternalError::peer_protocol("openFileAtLocation: missing line"))?;
                Ok(ExtensionMessage::OpenFileAtLocation {
                    file: PathBuf::from(file),
                    line,
                })
            }
            other => Err(InternalError::peer_protocol(format!(
                "Unknown peer message: {}",
                other
            ))),
        }
    }
}

/// Response from the editor peer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PeerResponse {
    pub id: u64,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PeerResponse {
    /// Create a success response
    pub fn success(id: u64) -> Self {
        Self {
            id,
            ok: true,
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: u64, message: impl Into<String>) -> Self {
        Self {
            id,
            ok: false,
            error: Some(message.into()),
        }
    }

    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line).wrap_err(ErrorCode::PeerProtocol, "Malformed response from editor")
    }

    /// Serialize as one wire line (without the trailing newline)
    pub fn to_line(&self) -> String {
        json!(self).to_string()
    }
}

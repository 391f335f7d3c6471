//! Line-delimited JSON frames exchanged with the backend process.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request written to the backend's stdin, one per line.
#[derive(Debug, Serialize)]
pub struct Request<'a> {
    pub id: u64,
    pub method: &'a str,
    pub params: &'a Value,
}

impl Request<'_> {
    /// Serialize as a single line without the trailing newline.
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Error object carried by a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: i32,
    pub message: String,
}

/// Any line read from the backend's stdout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Frame {
    /// Answer to the request with the same `id`.
    Response {
        id: u64,
        #[serde(default)]
        result: Value,
        #[serde(default)]
        error: Option<RpcError>,
    },
    /// Unsolicited push on a named channel.
    Event {
        event: String,
        #[serde(default)]
        data: Value,
    },
}

impl Frame {
    pub fn decode(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Remote tool error {code}: {message}")]
    RemoteTool {
        code:    i64,
        message: String,
        data:    Option<serde_json::Value>,
    },

    #[error("Failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Preference store error: {0}")]
    Preferences(String),
}

impl ClientError {
    /// True for errors the remote service reported itself, as opposed to
    /// failures reaching it or making sense of its reply.
    pub fn is_remote(&self) -> bool {
        matches!(self, ClientError::RemoteTool { .. })
    }
}

impl From<crate::mcp::JsonRpcError> for ClientError {
    fn from(err: crate::mcp::JsonRpcError) -> Self {
        ClientError::RemoteTool {
            code:    err.code,
            message: err.message,
            data:    err.data,
        }
    }
}

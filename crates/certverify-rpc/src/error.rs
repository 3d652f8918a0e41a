//! Error types for the RPC layer.

use serde_json::Value;
use thiserror::Error;

use certverify_core::{abi, CoreError};

/// Errors that can occur while talking to the node.
///
/// Messages from the node are displayed verbatim so they can be shown to
/// the user as-is.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The HTTP request could not be completed.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error.
    #[error("{message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    /// The transaction was included but execution reverted.
    #[error("{0}")]
    Reverted(String),

    /// The node returned something that is not a valid answer.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Response JSON did not match the expected shape.
    #[error("invalid response: {0}")]
    Json(#[from] serde_json::Error),

    /// Contract data could not be encoded or decoded.
    #[error("{0}")]
    Core(#[from] CoreError),

    /// The node exposes no unlocked account to sign with.
    #[error("node reported no accounts to sign with")]
    NoAccounts,

    /// A required configuration value is empty.
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
}

impl RpcError {
    /// The revert reason, if this error carries an ABI-encoded `Error(string)`.
    pub fn revert_reason(&self) -> Option<String> {
        let RpcError::Rpc { data: Some(data), .. } = self else {
            return None;
        };

        // Nodes report revert data either as a bare hex string or nested in
        // an object under `data`.
        let hex_data = match data {
            Value::String(s) => s.as_str(),
            Value::Object(map) => map.get("data")?.as_str()?,
            _ => return None,
        };

        let bytes = hex::decode(hex_data.strip_prefix("0x").unwrap_or(hex_data)).ok()?;
        abi::decode_revert_reason(&bytes)
    }

    /// The message to surface for a failed write: the revert reason when the
    /// node supplied one, otherwise the error itself.
    pub fn reason(&self) -> String {
        self.revert_reason().unwrap_or_else(|| self.to_string())
    }
}

/// Result type for RPC operations.
pub type Result<T> = std::result::Result<T, RpcError>;

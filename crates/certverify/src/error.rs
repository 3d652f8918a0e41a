//! Error types for the client.

use certverify_core::ValidationError;
use certverify_insight::InsightError;
use certverify_rpc::RpcError;
use thiserror::Error;

/// Errors that can occur during client operations.
///
/// Validation and node errors display their message unchanged, since that
/// text is what the issue screen shows.
#[derive(Debug, Error)]
pub enum AppError {
    /// Required issuance fields are missing.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The node rejected or failed a request.
    #[error("{0}")]
    Rpc(#[from] RpcError),

    /// The insight client could not be built.
    #[error("insight error: {0}")]
    Insight(#[from] InsightError),

    /// The current role may not perform the operation.
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// A console command could not be understood.
    #[error("invalid command: {0}")]
    InvalidCommand(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

//! Error types for the insight service.

use thiserror::Error;

/// Errors from the text-generation service.
///
/// None of these reach the user: the requester replaces them with the
/// fallback sentence.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("missing API key")]
    MissingApiKey,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("service returned no text")]
    EmptyResponse,
}

/// Result type for insight operations.
pub type Result<T> = std::result::Result<T, InsightError>;

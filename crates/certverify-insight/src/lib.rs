//! # CertVerify Insight
//!
//! Decorative commentary for verified certificates, generated by a hosted
//! text model.
//!
//! The requester never fails: missing credentials, HTTP errors and empty
//! answers all produce [`INSIGHT_FALLBACK`](certverify_core::constants::INSIGHT_FALLBACK).

pub mod error;
pub mod gemini;
pub mod prompt;
pub mod service;

pub use error::{InsightError, Result};
pub use gemini::{GeminiClient, InsightConfig};
pub use prompt::InsightRequest;
pub use service::{InsightRequester, InsightService};

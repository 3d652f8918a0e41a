//! The service seam and the never-failing requester built on it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use certverify_core::constants::INSIGHT_FALLBACK;

use crate::error::Result;
use crate::prompt::InsightRequest;

/// A text-generation backend.
#[async_trait]
pub trait InsightService: Send + Sync {
    async fn generate(&self, request: &InsightRequest) -> Result<String>;
}

/// Requests insights and absorbs every failure.
#[derive(Clone)]
pub struct InsightRequester {
    service: Arc<dyn InsightService>,
}

impl InsightRequester {
    pub fn new(service: Arc<dyn InsightService>) -> Self {
        Self { service }
    }

    /// The generated sentence, or [`INSIGHT_FALLBACK`] when the service
    /// cannot produce one.
    pub async fn request(&self, request: &InsightRequest) -> String {
        match self.service.generate(request).await {
            Ok(text) => text,
            Err(err) => {
                warn!(cert_id = %request.cert_id, error = %err, "insight unavailable");
                INSIGHT_FALLBACK.to_string()
            }
        }
    }
}

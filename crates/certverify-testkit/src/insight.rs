//! Stub text-generation services.

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use certverify_insight::{InsightError, InsightRequest, InsightService, Result};

/// Always answers with the same text and remembers what it was asked.
pub struct StaticInsight {
    text: String,
    requests: Mutex<Vec<InsightRequest>>,
}

impl StaticInsight {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub async fn requests(&self) -> Vec<InsightRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl InsightService for StaticInsight {
    async fn generate(&self, request: &InsightRequest) -> Result<String> {
        self.requests.lock().await.push(request.clone());
        Ok(self.text.clone())
    }
}

/// Fails every request with an HTTP error status.
pub struct FailingInsight;

#[async_trait]
impl InsightService for FailingInsight {
    async fn generate(&self, _request: &InsightRequest) -> Result<String> {
        Err(InsightError::Status {
            status: 503,
            body: "model overloaded".into(),
        })
    }
}

/// Holds each request until [`release`](GatedInsight::release) is called.
pub struct GatedInsight {
    text: String,
    gate: Notify,
}

impl GatedInsight {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            gate: Notify::new(),
        }
    }

    /// Let one waiting (or the next) request complete.
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl InsightService for GatedInsight {
    async fn generate(&self, _request: &InsightRequest) -> Result<String> {
        self.gate.notified().await;
        Ok(self.text.clone())
    }
}

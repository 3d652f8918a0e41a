//! Transport abstraction for JSON-RPC calls.
//!
//! The transport layer handles request framing and delivery. The default
//! implementation posts JSON over HTTP; tests substitute an in-memory node.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, RpcError};
use crate::messages::{JsonRpcRequest, JsonRpcResponse};

/// Transport trait for issuing JSON-RPC requests to a node.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Send a request and return its `result` member.
    ///
    /// A JSON-RPC error response becomes [`RpcError::Rpc`].
    async fn request(&self, method: &str, params: Value) -> Result<Value>;

    /// The endpoint this transport talks to.
    fn url(&self) -> &str;
}

/// Factory for transports, keyed by endpoint URL.
pub trait Connector: Send + Sync {
    fn connect(&self, url: &str) -> Result<Arc<dyn RpcTransport>>;
}

/// JSON-RPC over HTTP POST.
pub struct HttpTransport {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);
        debug!(method, id, url = %self.url, "rpc request");

        let response = self.client.post(&self.url).json(&request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        // Some nodes pair a JSON-RPC error body with a non-2xx status; the
        // body carries the useful message, so parse it first.
        match serde_json::from_slice::<JsonRpcResponse>(&body) {
            Ok(parsed) => parsed.into_result(),
            Err(_) if !status.is_success() => Err(RpcError::InvalidResponse(format!(
                "HTTP {status} from {}",
                self.url
            ))),
            Err(e) => Err(RpcError::Json(e)),
        }
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// Creates [`HttpTransport`]s sharing one HTTP client.
#[derive(Clone)]
pub struct HttpConnector {
    client: reqwest::Client,
}

impl HttpConnector {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Connector for HttpConnector {
    fn connect(&self, url: &str) -> Result<Arc<dyn RpcTransport>> {
        if url.trim().is_empty() {
            return Err(RpcError::MissingConfig("rpc url"));
        }
        Ok(Arc::new(HttpTransport::new(url, self.client.clone())))
    }
}

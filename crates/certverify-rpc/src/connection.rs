//! Connections to a node and their reuse.

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::debug;

use certverify_core::U64;

use crate::error::{Result, RpcError};
use crate::messages::{CallRequest, RawReceipt, TransactionRequest, LATEST};
use crate::transport::{Connector, RpcTransport};

/// A typed view over a transport: the handful of `eth_*` methods the client
/// needs.
#[derive(Clone)]
pub struct Connection {
    transport: Arc<dyn RpcTransport>,
}

impl Connection {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    pub fn url(&self) -> &str {
        self.transport.url()
    }

    /// Current block height.
    pub async fn block_number(&self) -> Result<u64> {
        let value = self.transport.request("eth_blockNumber", json!([])).await?;
        let height: U64 = serde_json::from_value(value)?;
        Ok(height.to())
    }

    /// Accounts the node can sign for.
    pub async fn accounts(&self) -> Result<Vec<String>> {
        let value = self.transport.request("eth_accounts", json!([])).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Submit a transaction for the node to sign; returns its hash.
    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String> {
        let value = self
            .transport
            .request("eth_sendTransaction", json!([tx]))
            .await?;
        Ok(expect_str(&value, "eth_sendTransaction")?.to_string())
    }

    /// The receipt of a transaction, or `None` while it is pending.
    pub async fn transaction_receipt(&self, hash: &str) -> Result<Option<RawReceipt>> {
        let value = self
            .transport
            .request("eth_getTransactionReceipt", json!([hash]))
            .await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    /// Execute a read-only call against the latest block; returns hex data.
    pub async fn call(&self, call: &CallRequest) -> Result<String> {
        let value = self
            .transport
            .request("eth_call", json!([call, LATEST]))
            .await?;
        Ok(expect_str(&value, "eth_call")?.to_string())
    }
}

fn expect_str<'a>(value: &'a Value, method: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| RpcError::InvalidResponse(format!("{method} returned {value}")))
}

/// Hands out a connection per URL, reusing the last one while the URL is
/// unchanged.
///
/// Only one connection is held at a time. There is no pooling, retry or
/// health checking.
pub struct ConnectionManager {
    connector: Arc<dyn Connector>,
    current: Mutex<Option<Connection>>,
}

impl ConnectionManager {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            current: Mutex::new(None),
        }
    }

    /// The connection for `url`, creating one when the URL differs from the
    /// last call's.
    pub async fn connection(&self, url: &str) -> Result<Connection> {
        let mut current = self.current.lock().await;

        if let Some(conn) = current.as_ref() {
            if conn.url() == url {
                return Ok(conn.clone());
            }
        }

        debug!(url, "opening rpc connection");
        let conn = Connection::new(self.connector.connect(url)?);
        *current = Some(conn.clone());
        Ok(conn)
    }

    /// Drop the held connection; the next call reconnects.
    pub async fn reset(&self) {
        self.current.lock().await.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedTransport {
        url: String,
    }

    #[async_trait]
    impl RpcTransport for FixedTransport {
        async fn request(&self, method: &str, _params: Value) -> Result<Value> {
            match method {
                "eth_blockNumber" => Ok(json!("0x10")),
                "eth_accounts" => Ok(json!(["0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"])),
                "eth_getTransactionReceipt" => Ok(Value::Null),
                _ => Ok(json!(42)),
            }
        }

        fn url(&self) -> &str {
            &self.url
        }
    }

    #[derive(Default)]
    struct CountingConnector {
        connects: AtomicUsize,
    }

    impl Connector for CountingConnector {
        fn connect(&self, url: &str) -> Result<Arc<dyn RpcTransport>> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(FixedTransport { url: url.to_string() }))
        }
    }

    #[tokio::test]
    async fn test_connection_reused_for_same_url() {
        let connector = Arc::new(CountingConnector::default());
        let manager = ConnectionManager::new(connector.clone());

        manager.connection("http://a").await.unwrap();
        manager.connection("http://a").await.unwrap();
        assert_eq!(connector.connects.load(Ordering::SeqCst), 1);

        let conn = manager.connection("http://b").await.unwrap();
        assert_eq!(conn.url(), "http://b");
        assert_eq!(connector.connects.load(Ordering::SeqCst), 2);

        // Switching back is a new connection: only the last one is kept.
        manager.connection("http://a").await.unwrap();
        assert_eq!(connector.connects.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_reset_forces_reconnect() {
        let connector = Arc::new(CountingConnector::default());
        let manager = ConnectionManager::new(connector.clone());

        manager.connection("http://a").await.unwrap();
        manager.reset().await;
        manager.connection("http://a").await.unwrap();
        assert_eq!(connector.connects.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_typed_methods() {
        let conn = Connection::new(Arc::new(FixedTransport { url: "http://a".into() }));

        assert_eq!(conn.block_number().await.unwrap(), 16);
        assert_eq!(conn.accounts().await.unwrap().len(), 1);
        assert!(conn.transaction_receipt("0x1").await.unwrap().is_none());

        let err = conn
            .call(&CallRequest { to: "0x0".into(), data: "0x".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::InvalidResponse(_)));
    }
}

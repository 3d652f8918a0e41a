//! The Contract Gateway: issue, verify, and block height against a
//! configurable contract and endpoint.
//!
//! Every operation takes the contract address and RPC URL explicitly, so a
//! configuration change takes effect on the next call. The gateway owns the
//! [`ConnectionManager`], which keeps the last connection while the URL is
//! unchanged.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use certverify_core::{Certificate, TxReceiptInfo, VerificationResult};

use crate::connection::ConnectionManager;
use crate::contract::CertificateContract;
use crate::error::{Result, RpcError};
use crate::transport::{Connector, HttpConnector};

/// Configuration for the gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Delay between receipt lookups while waiting for inclusion.
    pub receipt_poll_interval: Duration,
    /// Index into `eth_accounts` of the account that signs issuances.
    pub signer_index: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            receipt_poll_interval: Duration::from_millis(250),
            // Hardhat account #0 deploys the contract and acts as admin.
            signer_index: 0,
        }
    }
}

pub struct ContractGateway {
    connections: ConnectionManager,
    config: GatewayConfig,
}

impl ContractGateway {
    pub fn new(connector: Arc<dyn Connector>, config: GatewayConfig) -> Self {
        Self {
            connections: ConnectionManager::new(connector),
            config,
        }
    }

    /// A gateway talking JSON-RPC over HTTP.
    pub fn http(config: GatewayConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpConnector::new()?), config))
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Build a contract handle, optionally bound to a signing account.
    pub async fn contract(
        &self,
        address: &str,
        rpc_url: &str,
        signer: Option<String>,
    ) -> Result<CertificateContract> {
        if address.trim().is_empty() {
            return Err(RpcError::MissingConfig("contract address"));
        }

        let connection = self.connections.connection(rpc_url).await?;
        let contract = CertificateContract::new(address, connection)
            .with_receipt_poll_interval(self.config.receipt_poll_interval);

        Ok(match signer {
            Some(signer) => contract.with_signer(signer),
            None => contract,
        })
    }

    /// The node account used to sign issuances.
    pub async fn signer(&self, rpc_url: &str) -> Result<String> {
        let connection = self.connections.connection(rpc_url).await?;
        let accounts = connection.accounts().await?;
        accounts
            .into_iter()
            .nth(self.config.signer_index)
            .ok_or(RpcError::NoAccounts)
    }

    /// Record a certificate and wait for inclusion.
    ///
    /// On failure the node's reason is returned as the error message; a
    /// decoded revert reason takes precedence over the raw RPC message.
    pub async fn issue(
        &self,
        address: &str,
        rpc_url: &str,
        cert: &Certificate,
    ) -> Result<TxReceiptInfo> {
        let result = async {
            let signer = self.signer(rpc_url).await?;
            let contract = self.contract(address, rpc_url, Some(signer)).await?;
            contract.issue(cert).await
        }
        .await;

        result.map_err(|err| {
            warn!(cert_id = %cert.id, error = %err, "issuance failed");
            match err.revert_reason() {
                Some(reason) => RpcError::Reverted(reason),
                None => err,
            }
        })
    }

    /// Look a certificate up by id.
    ///
    /// Any failure to complete the call is reported as
    /// [`VerificationResult::NotFound`]; the cause is only logged.
    pub async fn verify(&self, address: &str, rpc_url: &str, id: &str) -> VerificationResult {
        let result = async {
            let contract = self.contract(address, rpc_url, None).await?;
            contract.verify(id).await
        }
        .await;

        match result {
            Ok(cert) => {
                debug!(cert_id = id, found = cert.is_some(), "verification complete");
                VerificationResult::from(cert)
            }
            Err(err) => {
                warn!(cert_id = id, error = %err, "verification failed, reporting not found");
                VerificationResult::NotFound
            }
        }
    }

    /// Current block height, or 0 when the node cannot be reached.
    pub async fn current_block_number(&self, rpc_url: &str) -> u64 {
        let result = async {
            let connection = self.connections.connection(rpc_url).await?;
            connection.block_number().await
        }
        .await;

        match result {
            Ok(height) => height,
            Err(err) => {
                debug!(url = rpc_url, error = %err, "block number unavailable");
                0
            }
        }
    }
}

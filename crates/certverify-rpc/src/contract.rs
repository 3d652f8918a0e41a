//! Typed handle to a deployed certificate contract.

use std::time::Duration;

use tracing::{debug, info};

use certverify_core::abi::decode_verify_output;
use certverify_core::{Certificate, ContractCall, TxReceiptInfo};

use crate::connection::Connection;
use crate::error::{Result, RpcError};
use crate::messages::{from_hex_data, to_hex_data, CallRequest, RawReceipt, TransactionRequest};

/// A contract at `address`, reached through `connection`.
///
/// Without a signer the handle can only perform read-only calls.
pub struct CertificateContract {
    address: String,
    connection: Connection,
    signer: Option<String>,
    receipt_poll_interval: Duration,
}

impl CertificateContract {
    pub fn new(address: impl Into<String>, connection: Connection) -> Self {
        Self {
            address: address.into(),
            connection,
            signer: None,
            receipt_poll_interval: Duration::from_millis(250),
        }
    }

    /// Attach the account the node signs transactions for.
    pub fn with_signer(mut self, signer: impl Into<String>) -> Self {
        self.signer = Some(signer.into());
        self
    }

    /// How often to ask the node whether a submitted transaction is included.
    pub fn with_receipt_poll_interval(mut self, interval: Duration) -> Self {
        self.receipt_poll_interval = interval;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn signer(&self) -> Option<&str> {
        self.signer.as_deref()
    }

    /// Record `cert` and wait for the transaction to be included.
    pub async fn issue(&self, cert: &Certificate) -> Result<TxReceiptInfo> {
        let from = self
            .signer
            .clone()
            .ok_or(RpcError::MissingConfig("signer"))?;

        let tx = TransactionRequest {
            from,
            to: self.address.clone(),
            data: to_hex_data(&ContractCall::Issue(cert.clone()).encode()),
        };

        let hash = self.connection.send_transaction(&tx).await?;
        debug!(hash = %hash, cert_id = %cert.id, "issue transaction submitted");

        let receipt = self.wait_for_receipt(&hash).await?;
        if !receipt.succeeded() {
            return Err(RpcError::Reverted("transaction execution reverted".into()));
        }

        let info = receipt.into_info(&self.address)?;
        info!(
            cert_id = %cert.id,
            hash = %info.hash,
            block = info.block_number,
            "certificate issued"
        );
        Ok(info)
    }

    /// Look up a certificate; `None` when the contract holds no record.
    pub async fn verify(&self, id: &str) -> Result<Option<Certificate>> {
        let call = CallRequest {
            to: self.address.clone(),
            data: to_hex_data(&ContractCall::Verify { id: id.to_string() }.encode()),
        };

        let output = from_hex_data(&self.connection.call(&call).await?)?;
        Ok(decode_verify_output(id, &output)?)
    }

    /// Poll until the node reports a receipt. There is no upper bound.
    async fn wait_for_receipt(&self, hash: &str) -> Result<RawReceipt> {
        loop {
            if let Some(receipt) = self.connection.transaction_receipt(hash).await? {
                return Ok(receipt);
            }
            tokio::time::sleep(self.receipt_poll_interval).await;
        }
    }
}

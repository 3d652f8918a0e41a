//! An in-memory development node speaking just enough Ethereum JSON-RPC.
//!
//! Behaves like a local Hardhat node with automining: every accepted
//! transaction is mined into its own block. The node hosts one
//! certificate contract and refuses to record an id twice.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use alloy_primitives::keccak256;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use certverify_core::abi::{encode_revert, encode_verify_output};
use certverify_core::constants::{DEFAULT_CONTRACT_ADDRESS, DEFAULT_RPC_URL};
use certverify_core::{Certificate, ContractCall, U256, U64};
use certverify_rpc::messages::{from_hex_data, to_hex_data};
use certverify_rpc::{CallRequest, Connector, Result, RpcError, RpcTransport, TransactionRequest};

/// Hardhat account #0, the contract's deployer.
pub const DEV_ACCOUNT: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

/// Gas charged for every issuance.
pub const ISSUE_GAS: u64 = 151_203;

/// 1.875 gwei.
pub const GAS_PRICE_WEI: u128 = 1_875_000_000;

const DUPLICATE_REASON: &str = "Certificate ID already exists";

#[derive(Default)]
struct DevState {
    height: u64,
    offline: bool,
    revert_reason: Option<String>,
    /// `eth_getTransactionReceipt` answers null this many times per tx.
    receipt_delay: u32,
    certificates: HashMap<String, Certificate>,
    receipts: HashMap<String, (Value, u32)>,
    calls: HashMap<String, usize>,
}

pub struct DevNode {
    url: String,
    contract: String,
    state: Mutex<DevState>,
}

impl DevNode {
    /// A node at [`DEFAULT_RPC_URL`] hosting [`DEFAULT_CONTRACT_ADDRESS`],
    /// with the deployment already mined in block 1.
    pub fn new() -> Arc<Self> {
        Self::at(DEFAULT_RPC_URL, DEFAULT_CONTRACT_ADDRESS)
    }

    pub fn at(url: impl Into<String>, contract: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            url: url.into(),
            contract: contract.into(),
            state: Mutex::new(DevState {
                height: 1,
                ..Default::default()
            }),
        })
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }

    pub async fn height(&self) -> u64 {
        self.state.lock().await.height
    }

    /// Mine `blocks` empty blocks.
    pub async fn mine(&self, blocks: u64) {
        self.state.lock().await.height += blocks;
    }

    /// While offline every request fails.
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
    }

    /// Revert every following transaction with `reason`, or stop doing so.
    pub async fn revert_with(&self, reason: Option<&str>) {
        self.state.lock().await.revert_reason = reason.map(String::from);
    }

    /// Report receipts only after `polls` unsuccessful lookups.
    pub async fn set_receipt_delay(&self, polls: u32) {
        self.state.lock().await.receipt_delay = polls;
    }

    /// Record a certificate directly, as if issued earlier.
    pub async fn insert(&self, cert: Certificate) {
        self.state
            .lock()
            .await
            .certificates
            .insert(cert.id.clone(), cert);
    }

    pub async fn certificate(&self, id: &str) -> Option<Certificate> {
        self.state.lock().await.certificates.get(id).cloned()
    }

    /// How often `method` was requested, including failed requests.
    pub async fn calls(&self, method: &str) -> usize {
        self.state.lock().await.calls.get(method).copied().unwrap_or(0)
    }

    pub async fn total_calls(&self) -> usize {
        self.state.lock().await.calls.values().sum()
    }

    fn is_contract(&self, address: &str) -> bool {
        address.eq_ignore_ascii_case(&self.contract)
    }

    fn send_transaction(&self, state: &mut DevState, params: Value) -> Result<Value> {
        let tx: TransactionRequest = serde_json::from_value(first_param(params)?)?;

        if self.is_contract(&tx.to) {
            if let ContractCall::Issue(cert) = ContractCall::decode(&from_hex_data(&tx.data)?)? {
                if let Some(reason) = state.revert_reason.clone() {
                    return Err(revert(&reason));
                }
                if state.certificates.contains_key(&cert.id) {
                    return Err(revert(DUPLICATE_REASON));
                }
                state.certificates.insert(cert.id.clone(), cert);
            }
        }

        state.height += 1;
        let hash = tx_hash(state.height, &tx.data);
        let receipt = json!({
            "transactionHash": hash,
            "blockNumber": U64::from(state.height),
            "gasUsed": U256::from(ISSUE_GAS),
            "effectiveGasPrice": U256::from(GAS_PRICE_WEI),
            "from": tx.from,
            "to": tx.to,
            "status": "0x1",
        });
        state
            .receipts
            .insert(hash.clone(), (receipt, state.receipt_delay));

        Ok(json!(hash))
    }

    fn transaction_receipt(&self, state: &mut DevState, params: Value) -> Result<Value> {
        let hash: String = serde_json::from_value(first_param(params)?)?;
        match state.receipts.get_mut(&hash) {
            Some((_, delay)) if *delay > 0 => {
                *delay -= 1;
                Ok(Value::Null)
            }
            Some((receipt, _)) => Ok(receipt.clone()),
            None => Ok(Value::Null),
        }
    }

    fn call(&self, state: &DevState, params: Value) -> Result<Value> {
        let call: CallRequest = serde_json::from_value(first_param(params)?)?;
        if !self.is_contract(&call.to) {
            // No code at the address.
            return Ok(json!("0x"));
        }

        match ContractCall::decode(&from_hex_data(&call.data)?)? {
            ContractCall::Verify { id } => {
                let output = encode_verify_output(state.certificates.get(&id));
                Ok(json!(to_hex_data(&output)))
            }
            ContractCall::Issue(_) => Ok(json!("0x")),
        }
    }
}

#[async_trait]
impl RpcTransport for DevNode {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let mut state = self.state.lock().await;
        *state.calls.entry(method.to_string()).or_default() += 1;

        if state.offline {
            return Err(RpcError::InvalidResponse(format!(
                "{} is not reachable",
                self.url
            )));
        }

        match method {
            "eth_blockNumber" => Ok(json!(U64::from(state.height))),
            "eth_accounts" => Ok(json!([DEV_ACCOUNT])),
            "eth_sendTransaction" => self.send_transaction(&mut state, params),
            "eth_getTransactionReceipt" => self.transaction_receipt(&mut state, params),
            "eth_call" => self.call(&state, params),
            other => Err(RpcError::Rpc {
                code: -32601,
                message: format!("Method {other} is not supported"),
                data: None,
            }),
        }
    }

    fn url(&self) -> &str {
        &self.url
    }
}

fn first_param(params: Value) -> Result<Value> {
    match params {
        Value::Array(mut items) if !items.is_empty() => Ok(items.swap_remove(0)),
        other => Err(RpcError::InvalidResponse(format!("bad params: {other}"))),
    }
}

fn tx_hash(height: u64, data: &str) -> String {
    let mut preimage = height.to_be_bytes().to_vec();
    preimage.extend_from_slice(data.as_bytes());
    format!("0x{}", hex::encode(keccak256(preimage)))
}

/// The error a node returns when execution reverts with `reason`.
pub fn revert(reason: &str) -> RpcError {
    let data = encode_revert(reason);

    RpcError::Rpc {
        code: -32603,
        message: format!(
            "Error: VM Exception while processing transaction: reverted with reason string '{reason}'"
        ),
        data: Some(json!(to_hex_data(&data))),
    }
}

/// A set of dev nodes addressed by URL.
///
/// Connecting to an unknown URL fails the way an unreachable host does.
#[derive(Default)]
pub struct DevNetwork {
    nodes: HashMap<String, Arc<DevNode>>,
    connects: AtomicUsize,
}

impl DevNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: Arc<DevNode>) -> Self {
        self.nodes.insert(node.url.clone(), node);
        self
    }

    /// How many connections were built.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl Connector for DevNetwork {
    fn connect(&self, url: &str) -> Result<Arc<dyn RpcTransport>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match self.nodes.get(url) {
            Some(node) => Ok(node.clone() as Arc<dyn RpcTransport>),
            None => Err(RpcError::InvalidResponse(format!("{url} is not reachable"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certverify_core::abi::decode_verify_output;

    fn alice() -> Certificate {
        Certificate {
            id: "2024-CS-001".into(),
            name: "Alice Johnson".into(),
            course: "B.Sc CS".into(),
            issue_date: "2024-05-01".into(),
            expiry_date: String::new(),
        }
    }

    fn issue_params(node: &DevNode, cert: &Certificate) -> Value {
        json!([{
            "from": DEV_ACCOUNT,
            "to": node.contract(),
            "data": to_hex_data(&ContractCall::Issue(cert.clone()).encode()),
        }])
    }

    #[tokio::test]
    async fn test_issue_mines_a_block() {
        let node = DevNode::new();
        let hash = node
            .request("eth_sendTransaction", issue_params(&node, &alice()))
            .await
            .unwrap();

        assert_eq!(node.height().await, 2);
        assert_eq!(node.certificate("2024-CS-001").await, Some(alice()));

        let receipt = node
            .request("eth_getTransactionReceipt", json!([hash]))
            .await
            .unwrap();
        assert_eq!(receipt["blockNumber"], "0x2");
        assert_eq!(receipt["effectiveGasPrice"], "0x6fc23ac0");
        assert_eq!(receipt["status"], "0x1");
    }

    #[tokio::test]
    async fn test_duplicate_id_reverts() {
        let node = DevNode::new();
        node.insert(alice()).await;

        let err = node
            .request("eth_sendTransaction", issue_params(&node, &alice()))
            .await
            .unwrap_err();
        assert_eq!(err.revert_reason().as_deref(), Some(DUPLICATE_REASON));
        assert_eq!(node.height().await, 1);
    }

    #[tokio::test]
    async fn test_receipt_delay() {
        let node = DevNode::new();
        node.set_receipt_delay(2).await;
        let hash = node
            .request("eth_sendTransaction", issue_params(&node, &alice()))
            .await
            .unwrap();

        for _ in 0..2 {
            let receipt = node
                .request("eth_getTransactionReceipt", json!([hash.clone()]))
                .await
                .unwrap();
            assert!(receipt.is_null());
        }
        let receipt = node
            .request("eth_getTransactionReceipt", json!([hash]))
            .await
            .unwrap();
        assert!(!receipt.is_null());
    }

    #[tokio::test]
    async fn test_call_verify() {
        let node = DevNode::new();
        node.insert(alice()).await;

        let data = to_hex_data(&ContractCall::Verify { id: alice().id }.encode());
        let output = node
            .request("eth_call", json!([{ "to": node.contract(), "data": data }, "latest"]))
            .await
            .unwrap();
        let bytes = from_hex_data(output.as_str().unwrap()).unwrap();
        assert_eq!(decode_verify_output("2024-CS-001", &bytes).unwrap(), Some(alice()));

        let elsewhere = node
            .request("eth_call", json!([{ "to": "0x0000000000000000000000000000000000000001", "data": data }, "latest"]))
            .await
            .unwrap();
        assert_eq!(elsewhere, "0x");
    }

    #[tokio::test]
    async fn test_offline_counts_calls() {
        let node = DevNode::new();
        node.set_offline(true).await;

        assert!(node.request("eth_blockNumber", json!([])).await.is_err());
        assert_eq!(node.calls("eth_blockNumber").await, 1);
        assert_eq!(node.total_calls().await, 1);
    }

    #[test]
    fn test_network_unknown_url() {
        let network = DevNetwork::new().with_node(DevNode::new());

        assert!(network.connect(DEFAULT_RPC_URL).is_ok());
        assert!(network.connect("http://10.9.9.9:8545").is_err());
        assert_eq!(network.connects(), 2);
    }
}

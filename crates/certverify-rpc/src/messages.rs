//! JSON-RPC 2.0 envelopes and the Ethereum payloads the client exchanges.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use certverify_core::{format_gwei, CoreError, TxReceiptInfo, U256, U64};

use crate::error::{Result, RpcError};

pub const JSONRPC_VERSION: &str = "2.0";

/// Block tag used for read-only calls.
pub const LATEST: &str = "latest";

/// A JSON-RPC request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Value,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// The error member of a failed JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A JSON-RPC response: exactly one of `result` or `error` is meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorObject>,
}

impl JsonRpcResponse {
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Value::from(id),
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: u64, error: JsonRpcErrorObject) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Value::from(id),
            result: None,
            error: Some(error),
        }
    }

    /// Unwrap the result. A `null` or absent result becomes `Value::Null`.
    pub fn into_result(self) -> Result<Value> {
        if let Some(err) = self.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
                data: err.data,
            });
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

/// Parameters of `eth_sendTransaction`; the node signs for `from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub from: String,
    pub to: String,
    /// `0x`-prefixed calldata.
    pub data: String,
}

/// Parameters of `eth_call`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    pub to: String,
    pub data: String,
}

/// The fields of `eth_getTransactionReceipt` the client uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReceipt {
    pub transaction_hash: String,
    pub block_number: U64,
    pub gas_used: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_gas_price: Option<U256>,
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    /// `0x1` on success, `0x0` when execution reverted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<U64>,
}

impl RawReceipt {
    /// Whether the transaction executed without reverting.
    ///
    /// Receipts that predate the status field count as successful.
    pub fn succeeded(&self) -> bool {
        self.status.map_or(true, |status| !status.is_zero())
    }

    /// Map into the client's receipt shape.
    ///
    /// `contract` fills in the recipient when the node reports none.
    pub fn into_info(self, contract: &str) -> Result<TxReceiptInfo> {
        let gas_price = self.effective_gas_price.unwrap_or_default();

        Ok(TxReceiptInfo {
            hash: self.transaction_hash,
            block_number: self.block_number.to(),
            gas_used: self.gas_used.to_string(),
            effective_gas_price: format_gwei(gas_price)?,
            from: self.from,
            to: self.to.unwrap_or_else(|| contract.to_string()),
        })
    }
}

/// Encode bytes as `0x`-prefixed hex data.
pub fn to_hex_data(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode `0x`-prefixed hex data.
pub fn from_hex_data(data: &str) -> Result<Vec<u8>> {
    let digits = data.strip_prefix("0x").unwrap_or(data);
    Ok(hex::decode(digits).map_err(CoreError::from)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn receipt() -> RawReceipt {
        serde_json::from_value(json!({
            "transactionHash": "0xabc",
            "blockNumber": "0x2",
            "gasUsed": "0x1e240",
            "effectiveGasPrice": "0x6fc23ac0",
            "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            "to": null,
            "status": "0x1",
            "logs": []
        }))
        .unwrap()
    }

    #[test]
    fn test_receipt_maps_to_info() {
        let info = receipt().into_info("0xcontract").unwrap();
        assert_eq!(info.hash, "0xabc");
        assert_eq!(info.block_number, 2);
        assert_eq!(info.gas_used, "123456");
        assert_eq!(info.effective_gas_price, "1.875");
        assert_eq!(info.to, "0xcontract");
    }

    #[test]
    fn test_receipt_status() {
        assert!(receipt().succeeded());

        let reverted = RawReceipt {
            status: Some(U64::ZERO),
            ..receipt()
        };
        assert!(!reverted.succeeded());

        let legacy = RawReceipt {
            status: None,
            ..receipt()
        };
        assert!(legacy.succeeded());
    }

    #[test]
    fn test_receipt_without_gas_price() {
        let info = RawReceipt {
            effective_gas_price: None,
            ..receipt()
        }
        .into_info("0xcontract")
        .unwrap();
        assert_eq!(info.effective_gas_price, "0.0");
    }

    #[test]
    fn test_malformed_quantity_is_rejected() {
        let bad = serde_json::from_value::<RawReceipt>(json!({
            "transactionHash": "0xabc",
            "blockNumber": "two",
            "gasUsed": "0x1",
            "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_response_error_is_surfaced() {
        let resp: JsonRpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32000, "message": "insufficient funds" }
        }))
        .unwrap();

        let err = resp.into_result().unwrap_err();
        assert_eq!(err.to_string(), "insufficient funds");
    }

    #[test]
    fn test_null_result() {
        let resp: JsonRpcResponse =
            serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 7, "result": null })).unwrap();
        assert_eq!(resp.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn test_hex_data() {
        assert_eq!(to_hex_data(&[0xde, 0xad]), "0xdead");
        assert_eq!(from_hex_data("0xdead").unwrap(), vec![0xde, 0xad]);
        assert!(from_hex_data("0xzz").is_err());
    }
}

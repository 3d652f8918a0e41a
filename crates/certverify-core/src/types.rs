//! Data model for certificates and the results of contract operations.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CONTRACT_ADDRESS, DEFAULT_RPC_URL};

/// A credential as recorded on the remote ledger.
///
/// The `id` is assigned by the issuer and acts as the primary key of the
/// contract's mapping. Once recorded, a certificate is never modified;
/// the values returned by `verify` are authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    pub name: String,
    pub course: String,
    pub issue_date: String,
    /// Empty when the certificate never expires.
    pub expiry_date: String,
}

impl Certificate {
    /// The expiry date, if one was recorded.
    pub fn expiry(&self) -> Option<&str> {
        if self.expiry_date.is_empty() {
            None
        } else {
            Some(&self.expiry_date)
        }
    }
}

/// Outcome of looking a certificate up by id.
///
/// A fresh value is produced for every verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    /// The ledger holds a record for the id.
    Valid(Certificate),
    /// No record exists, or the lookup could not be completed.
    NotFound,
}

impl VerificationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationResult::Valid(_))
    }

    /// The verified certificate, if any.
    pub fn certificate(&self) -> Option<&Certificate> {
        match self {
            VerificationResult::Valid(cert) => Some(cert),
            VerificationResult::NotFound => None,
        }
    }
}

impl From<Option<Certificate>> for VerificationResult {
    fn from(cert: Option<Certificate>) -> Self {
        match cert {
            Some(cert) => VerificationResult::Valid(cert),
            None => VerificationResult::NotFound,
        }
    }
}

/// Metadata of an issuance transaction once it is included in a block.
///
/// Purely informational; the client never persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceiptInfo {
    /// Transaction hash, `0x`-prefixed.
    pub hash: String,
    pub block_number: u64,
    /// Gas consumed, as a decimal string.
    pub gas_used: String,
    /// Effective gas price in gwei, as a decimal string.
    pub effective_gas_price: String,
    pub from: String,
    pub to: String,
}

/// Where the client finds the contract.
///
/// Both values may be edited at any time and take effect on the next call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub contract_address: String,
    pub rpc_url: String,
}

impl AppConfig {
    pub fn new(contract_address: impl Into<String>, rpc_url: impl Into<String>) -> Self {
        Self {
            contract_address: contract_address.into(),
            rpc_url: rpc_url.into(),
        }
    }

    /// Whether both values are present. No other validation is performed.
    pub fn is_complete(&self) -> bool {
        !self.contract_address.trim().is_empty() && !self.rpc_url.trim().is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CONTRACT_ADDRESS, DEFAULT_RPC_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Certificate {
        Certificate {
            id: "2024-CS-001".into(),
            name: "Alice Johnson".into(),
            course: "B.Sc CS".into(),
            issue_date: "2024-05-01".into(),
            expiry_date: String::new(),
        }
    }

    #[test]
    fn test_expiry_empty_is_none() {
        assert_eq!(alice().expiry(), None);

        let cert = Certificate {
            expiry_date: "2030-01-01".into(),
            ..alice()
        };
        assert_eq!(cert.expiry(), Some("2030-01-01"));
    }

    #[test]
    fn test_verification_from_option() {
        let found = VerificationResult::from(Some(alice()));
        assert!(found.is_valid());
        assert_eq!(found.certificate().map(|c| c.name.as_str()), Some("Alice Johnson"));

        let missing = VerificationResult::from(None);
        assert!(!missing.is_valid());
        assert!(missing.certificate().is_none());
    }

    #[test]
    fn test_certificate_serializes_camel_case() {
        let json = serde_json::to_value(alice()).unwrap();
        assert_eq!(json["issueDate"], "2024-05-01");
        assert_eq!(json["expiryDate"], "");
    }

    #[test]
    fn test_config_defaults_and_presence() {
        let config = AppConfig::default();
        assert_eq!(config.rpc_url, "http://127.0.0.1:8545");
        assert!(config.is_complete());

        let blank = AppConfig::new("", "http://localhost:8545");
        assert!(!blank.is_complete());
    }
}

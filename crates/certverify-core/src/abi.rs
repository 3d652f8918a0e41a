//! Contract bindings for the certificate registry.
//!
//! The registry exposes two functions, both taking and returning only
//! `string` values. Reverts carry the standard `Error(string)` payload,
//! which alloy models as [`Revert`].

use alloy_sol_types::{sol, SolCall, SolError, SolInterface};

pub use alloy_sol_types::Revert;

use crate::error::CoreError;
use crate::types::Certificate;

sol! {
    /// The deployed certificate registry.
    interface ICertificateRegistry {
        function issue(
            string id,
            string name,
            string course,
            string issueDate,
            string expiryDate
        ) external;

        function verify(string id)
            external
            view
            returns (string name, string course, string issueDate, string expiryDate);
    }
}

pub use ICertificateRegistry::{issueCall, verifyCall, ICertificateRegistryCalls};

/// A call to the certificate contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    /// Record a new certificate (state-changing).
    Issue(Certificate),
    /// Look a certificate up by id (read-only).
    Verify { id: String },
}

impl ContractCall {
    pub fn signature(&self) -> &'static str {
        match self {
            ContractCall::Issue(_) => issueCall::SIGNATURE,
            ContractCall::Verify { .. } => verifyCall::SIGNATURE,
        }
    }

    pub fn selector(&self) -> [u8; 4] {
        match self {
            ContractCall::Issue(_) => issueCall::SELECTOR,
            ContractCall::Verify { .. } => verifyCall::SELECTOR,
        }
    }

    /// Selector followed by the encoded arguments.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            ContractCall::Issue(cert) => issueCall::from(cert.clone()).abi_encode(),
            ContractCall::Verify { id } => verifyCall { id: id.clone() }.abi_encode(),
        }
    }

    /// Parse calldata produced by [`ContractCall::encode`].
    pub fn decode(calldata: &[u8]) -> Result<Self, CoreError> {
        match ICertificateRegistryCalls::abi_decode(calldata, true)? {
            ICertificateRegistryCalls::issue(call) => Ok(ContractCall::Issue(call.into())),
            ICertificateRegistryCalls::verify(call) => Ok(ContractCall::Verify { id: call.id }),
        }
    }
}

impl From<Certificate> for issueCall {
    fn from(cert: Certificate) -> Self {
        issueCall {
            id: cert.id,
            name: cert.name,
            course: cert.course,
            issueDate: cert.issue_date,
            expiryDate: cert.expiry_date,
        }
    }
}

impl From<issueCall> for Certificate {
    fn from(call: issueCall) -> Self {
        Certificate {
            id: call.id,
            name: call.name,
            course: call.course,
            issue_date: call.issueDate,
            expiry_date: call.expiryDate,
        }
    }
}

/// Encode the return value of `verify` for a stored certificate.
///
/// An unknown id is answered with four empty strings.
pub fn encode_verify_output(cert: Option<&Certificate>) -> Vec<u8> {
    let fields = match cert {
        Some(c) => (
            c.name.clone(),
            c.course.clone(),
            c.issue_date.clone(),
            c.expiry_date.clone(),
        ),
        None => Default::default(),
    };
    verifyCall::abi_encode_returns(&fields)
}

/// Decode the return value of `verify`.
///
/// The contract returns empty strings for an unknown id, so an empty name
/// means the certificate does not exist.
pub fn decode_verify_output(id: &str, data: &[u8]) -> Result<Option<Certificate>, CoreError> {
    let ret = verifyCall::abi_decode_returns(data, true)?;
    if ret.name.is_empty() {
        return Ok(None);
    }

    Ok(Some(Certificate {
        id: id.to_string(),
        name: ret.name,
        course: ret.course,
        issue_date: ret.issueDate,
        expiry_date: ret.expiryDate,
    }))
}

/// The reason string of an `Error(string)` revert payload.
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    Revert::abi_decode(data, true).ok().map(|revert| revert.reason)
}

/// Encode `reason` the way the contract's `require` reverts do.
pub fn encode_revert(reason: &str) -> Vec<u8> {
    Revert {
        reason: reason.to_string(),
    }
    .abi_encode()
}

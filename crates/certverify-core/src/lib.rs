//! # CertVerify Core
//!
//! Pure primitives for the CertVerify client: certificates, verification
//! results, transaction receipts, and the contract call codec.
//!
//! This crate contains no I/O and no networking. It is pure computation
//! over the data exchanged with the certificate contract.
//!
//! ## Key Types
//!
//! - [`Certificate`] - A credential as recorded on the ledger
//! - [`VerificationResult`] - Outcome of a lookup by certificate id
//! - [`TxReceiptInfo`] - Metadata of an included issuance transaction
//! - [`AppConfig`] - Contract address and RPC endpoint
//! - [`ContractCall`] - The two calls the contract understands
//!
//! ## Encoding
//!
//! Calls are encoded with the Solidity ABI through alloy's `sol!` bindings.
//! See [`abi`] module.

pub mod abi;
pub mod constants;
pub mod error;
pub mod types;
pub mod units;
pub mod validation;

pub use abi::{ContractCall, Revert};
pub use error::{CoreError, Field, ValidationError};
pub use types::{AppConfig, Certificate, TxReceiptInfo, VerificationResult};
pub use units::format_gwei;

pub use alloy_primitives::{U256, U64};
pub use validation::{suggest_certificate_id, IssueRequest};

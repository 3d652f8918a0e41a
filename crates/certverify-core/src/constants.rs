//! Fixed strings and defaults shared by every front-end.

/// Default local Hardhat node URL.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Address of the first contract deployed by Hardhat account #0.
///
/// Must be updated after deploying to any other node.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

pub const APP_TITLE: &str = "CertVerify";
pub const APP_SUBTITLE: &str = "Immutable Credential Verification";

/// Shown above the issue form.
pub const ADMIN_NOTICE: &str =
    "Admin Mode: This action will write data to the blockchain. Ensure your local Hardhat node is running.";

/// Shown on the home screen to verifiers.
pub const VERIFIER_HINT: &str = "Note: Switch to \"Admin\" role in the navbar to issue certificates.";

/// Shown in place of an AI insight whenever the service cannot produce one.
pub const INSIGHT_FALLBACK: &str = "Verified on Ethereum. (AI Insight unavailable)";

/// Network label displayed next to the block counter.
pub const NETWORK_LABEL: &str = "Local Hardhat";

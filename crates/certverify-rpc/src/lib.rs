//! # CertVerify RPC
//!
//! Everything that talks to the node: JSON-RPC transport, connection reuse,
//! the certificate contract binding, and the block height poller.
//!
//! ## Overview
//!
//! - [`RpcTransport`] - Sends JSON-RPC requests (HTTP by default)
//! - [`ConnectionManager`] - Keeps one connection, rebuilt when the URL changes
//! - [`CertificateContract`] - Typed `issue` / `verify` calls for one address
//! - [`ContractGateway`] - The operations the UI calls, with their
//!   failure policies
//! - [`BlockPoller`] - Periodic `eth_blockNumber`, published via a watch channel
//!
//! ## Usage
//!
//! ```rust,no_run
//! use certverify_rpc::{ContractGateway, GatewayConfig};
//!
//! async fn example() {
//!     let gateway = ContractGateway::http(GatewayConfig::default()).unwrap();
//!
//!     let result = gateway
//!         .verify(
//!             "0x5FbDB2315678afecb367f032d93F642f64180aa3",
//!             "http://127.0.0.1:8545",
//!             "2024-CS-001",
//!         )
//!         .await;
//!     println!("valid: {}", result.is_valid());
//! }
//! ```

pub mod connection;
pub mod contract;
pub mod error;
pub mod gateway;
pub mod messages;
pub mod poller;
pub mod transport;

pub use connection::{Connection, ConnectionManager};
pub use contract::CertificateContract;
pub use error::{Result, RpcError};
pub use gateway::{ContractGateway, GatewayConfig};
pub use messages::{
    CallRequest, JsonRpcErrorObject, JsonRpcRequest, JsonRpcResponse, RawReceipt,
    TransactionRequest,
};
pub use poller::{BlockPoller, PollerHandle, DEFAULT_POLL_INTERVAL};
pub use transport::{Connector, HttpConnector, HttpTransport, RpcTransport};

//! # CertVerify Testkit
//!
//! Testing utilities for CertVerify.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Dev node**: an in-memory node implementing `RpcTransport`, with
//!   automining, call counting, revert injection and an offline switch
//! - **Insight stubs**: fixed, failing and gated text-generation services
//! - **Generators**: Proptest strategies for certificates and forms
//! - **Fixtures**: a node wired to a gateway, and sample certificates
//!
//! ## Test Fixtures
//!
//! ```rust
//! use certverify_testkit::fixtures::{alice, TestFixture};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let fixture = TestFixture::new();
//! fixture.node.insert(alice()).await;
//! assert_eq!(fixture.node.height().await, 1);
//! # }
//! ```

pub mod fixtures;
pub mod generators;
pub mod insight;
pub mod node;

pub use fixtures::{alice, alice_form, TestFixture};
pub use insight::{FailingInsight, GatedInsight, StaticInsight};
pub use node::{DevNetwork, DevNode, DEV_ACCOUNT};

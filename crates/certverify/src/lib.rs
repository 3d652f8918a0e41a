//! # CertVerify
//!
//! A client for issuing and verifying academic credentials recorded by a
//! smart contract on an Ethereum-compatible node.
//!
//! ## Overview
//!
//! - **Issue**: an admin fills in a certificate and records it on the
//!   ledger, then sees the transaction receipt
//! - **Verify**: anyone looks a certificate up by id; valid certificates get
//!   a short AI-generated commentary
//! - **Block counter**: the node's height is polled for the footer
//!
//! The [`Session`] state machine decides what is shown, [`render`] turns it
//! into a [`Screen`], and the [`App`] wires the session to the network.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use certverify::{App, ClientConfig, ViewState};
//!
//! async fn example() {
//!     let app = App::connect(ClientConfig::default()).unwrap();
//!     app.start_polling().await;
//!
//!     app.navigate(ViewState::Verify).await;
//!     app.set_verify_input("2024-CS-001").await;
//!     if let Some(outcome) = app.submit_verify().await {
//!         println!("valid: {}", outcome.result.is_valid());
//!     }
//!
//!     println!("{}", app.render().await);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `certverify::core` - Data model, ABI codec and validation
//! - `certverify::rpc` - JSON-RPC transport, gateway and block poller
//! - `certverify::insight` - AI insight requester

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod session;
mod text;
pub mod view;

// Re-export component crates
pub use certverify_core as core;
pub use certverify_insight as insight;
pub use certverify_rpc as rpc;

pub use app::{App, VerifyOutcome};
pub use cli::{Command, Reply};
pub use config::ClientConfig;
pub use error::{AppError, Result};
pub use session::{InsightState, Role, Session, VerifyTicket, ViewState};
pub use view::{render, Screen};

pub use certverify_core::{AppConfig, Certificate, TxReceiptInfo, VerificationResult};

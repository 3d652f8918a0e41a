//! The App: one session wired to the gateway, the block poller and the
//! insight requester.
//!
//! The three background activities (block polling, issuance and the
//! verify-then-insight chain) write disjoint parts of the shared
//! [`Session`]. The write lock is only taken between network calls.

use std::sync::Arc;

use chrono::Datelike;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use certverify_core::{suggest_certificate_id, AppConfig, IssueRequest, TxReceiptInfo, VerificationResult};
use certverify_insight::{GeminiClient, InsightRequest, InsightRequester, InsightService};
use certverify_rpc::{BlockPoller, ContractGateway, PollerHandle};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::session::{Role, Session, ViewState};
use crate::view::{render, Screen};

/// A running block poll plus the task copying its heights into the session.
struct Polling {
    handle: PollerHandle,
    forward: JoinHandle<()>,
}

impl Drop for Polling {
    fn drop(&mut self) {
        self.forward.abort();
    }
}

/// Result of a submitted verification.
pub struct VerifyOutcome {
    pub result: VerificationResult,
    /// The insight task, present when the certificate was valid.
    pub insight: Option<JoinHandle<()>>,
}

pub struct App {
    session: Arc<RwLock<Session>>,
    gateway: Arc<ContractGateway>,
    insight: InsightRequester,
    config: ClientConfig,
    polling: Mutex<Option<Polling>>,
}

impl App {
    pub fn new(
        config: ClientConfig,
        gateway: Arc<ContractGateway>,
        insight: Arc<dyn InsightService>,
    ) -> Self {
        let session = Session::new(config.app.clone()).with_role(config.role);
        Self {
            session: Arc::new(RwLock::new(session)),
            gateway,
            insight: InsightRequester::new(insight),
            config,
            polling: Mutex::new(None),
        }
    }

    /// An app talking JSON-RPC over HTTP and Gemini for insights.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let gateway = Arc::new(ContractGateway::http(config.gateway())?);
        let insight = Arc::new(GeminiClient::new(config.insight.clone())?);
        Ok(Self::new(config, gateway, insight))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn gateway(&self) -> &Arc<ContractGateway> {
        &self.gateway
    }

    /// A copy of the current session state.
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Render the current state.
    pub async fn render(&self) -> Screen {
        render(&*self.session.read().await, current_year())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation & configuration
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn navigate(&self, view: ViewState) -> bool {
        self.session.write().await.navigate(view)
    }

    pub async fn toggle_role(&self) -> Role {
        let role = self.session.write().await.toggle_role();
        info!(%role, "role changed");
        role
    }

    /// Replace the contract address and RPC URL. Takes effect on the next
    /// call; a running poll moves to the new URL.
    pub async fn update_config(&self, config: AppConfig) {
        let mut polling = self.polling.lock().await;

        // The old poll stops before the height is reset so it cannot write
        // the previous node's height afterwards.
        let moved = self.session.read().await.config.rpc_url != config.rpc_url;
        let restart = moved && polling.take().is_some();

        self.session.write().await.set_config(config.clone());
        info!(
            contract = %config.contract_address,
            rpc_url = %config.rpc_url,
            "configuration updated"
        );

        if restart {
            *polling = Some(self.spawn_poll(config.rpc_url));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Form editing
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn edit_issue_form(&self, edit: impl FnOnce(&mut IssueRequest)) {
        edit(&mut self.session.write().await.issue.form);
    }

    /// Fill the id field with a fresh `CERT-<year>-<n>` suggestion.
    pub async fn suggest_issue_id(&self) -> String {
        let id = suggest_certificate_id(current_year(), &mut rand::thread_rng());
        self.session.write().await.issue.form.id = id.clone();
        id
    }

    pub async fn set_verify_input(&self, id: impl Into<String>) {
        self.session.write().await.verify.input = id.into();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Block polling
    // ─────────────────────────────────────────────────────────────────────────

    /// Start polling the configured RPC URL, replacing any running poll.
    /// Does nothing when polling is disabled.
    pub async fn start_polling(&self) {
        if !self.config.polling_enabled {
            debug!("block polling disabled");
            return;
        }
        let rpc_url = self.session.read().await.config.rpc_url.clone();
        *self.polling.lock().await = Some(self.spawn_poll(rpc_url));
    }

    pub async fn stop_polling(&self) {
        self.polling.lock().await.take();
    }

    pub async fn is_polling(&self) -> bool {
        self.polling
            .lock()
            .await
            .as_ref()
            .is_some_and(|p| p.handle.is_running())
    }

    fn spawn_poll(&self, rpc_url: String) -> Polling {
        let handle = BlockPoller::spawn(self.gateway.clone(), rpc_url, self.config.poll_interval);
        let mut heights = handle.subscribe();
        let session = self.session.clone();

        let forward = tokio::spawn(async move {
            while heights.changed().await.is_ok() {
                let height = *heights.borrow_and_update();
                session.write().await.set_block_height(height);
            }
        });

        Polling { handle, forward }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Issuance & verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate the issue form and record it on the ledger.
    ///
    /// Validation failures never reach the network. On success the form is
    /// cleared and the block counter refreshed.
    pub async fn submit_issue(&self) -> Result<TxReceiptInfo> {
        let (cert, config) = {
            let mut session = self.session.write().await;
            let cert = session.begin_issue()?;
            (cert, session.config.clone())
        };

        let outcome = self
            .gateway
            .issue(&config.contract_address, &config.rpc_url, &cert)
            .await;

        match outcome {
            Ok(receipt) => {
                let height = self.gateway.current_block_number(&config.rpc_url).await;
                let mut session = self.session.write().await;
                session.finish_issue(Ok(receipt.clone()));
                session.set_block_height(height);
                Ok(receipt)
            }
            Err(err) => {
                self.session
                    .write()
                    .await
                    .finish_issue(Err(err.to_string()));
                Err(err.into())
            }
        }
    }

    /// Look up the typed id. Returns `None` when the id is empty.
    ///
    /// A valid result starts the insight request in the background; the
    /// returned outcome carries its handle.
    pub async fn submit_verify(&self) -> Option<VerifyOutcome> {
        let (ticket, config) = {
            let mut session = self.session.write().await;
            let ticket = session.begin_verify()?;
            (ticket, session.config.clone())
        };

        let result = self
            .gateway
            .verify(&config.contract_address, &config.rpc_url, &ticket.id)
            .await;

        let wants_insight = self
            .session
            .write()
            .await
            .finish_verify(&ticket, result.clone());

        let insight = match result.certificate() {
            Some(cert) if wants_insight => {
                let request =
                    InsightRequest::new(&cert.name, &cert.id, &config.contract_address);
                let requester = self.insight.clone();
                let session = self.session.clone();
                let generation = ticket.generation;

                Some(tokio::spawn(async move {
                    let text = requester.request(&request).await;
                    if !session.write().await.apply_insight(generation, text) {
                        debug!(generation, "discarded stale insight");
                    }
                }))
            }
            _ => None,
        };

        Some(VerifyOutcome { result, insight })
    }
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

//! Session state and the view/role state machine.
//!
//! All state lives for the duration of a session and is never persisted.
//! The role flag is client-trusted: it decides which screens are reachable
//! but is not an access-control boundary.

use std::fmt;
use std::str::FromStr;

use certverify_core::{
    AppConfig, Certificate, IssueRequest, TxReceiptInfo, VerificationResult,
};

use crate::error::{AppError, Result};

/// The active screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewState {
    #[default]
    Home,
    Issue,
    Verify,
    Settings,
}

impl ViewState {
    pub const ALL: [ViewState; 4] = [
        ViewState::Home,
        ViewState::Issue,
        ViewState::Verify,
        ViewState::Settings,
    ];

    /// Whether `role` may open this screen.
    pub fn allows(self, role: Role) -> bool {
        match self {
            ViewState::Issue => role == Role::Admin,
            _ => true,
        }
    }
}

impl FromStr for ViewState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "home" => Ok(ViewState::Home),
            "issue" => Ok(ViewState::Issue),
            "verify" => Ok(ViewState::Verify),
            "settings" => Ok(ViewState::Settings),
            other => Err(AppError::InvalidCommand(format!("unknown view: {other}"))),
        }
    }
}

/// Who the user claims to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    #[default]
    Verifier,
}

impl Role {
    pub fn toggled(self) -> Self {
        match self {
            Role::Admin => Role::Verifier,
            Role::Verifier => Role::Admin,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("Admin"),
            Role::Verifier => f.write_str("Verifier"),
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "verifier" => Ok(Role::Verifier),
            other => Err(AppError::InvalidCommand(format!("unknown role: {other}"))),
        }
    }
}

/// Issue screen state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueState {
    pub form: IssueRequest,
    pub pending: bool,
    pub receipt: Option<TxReceiptInfo>,
    pub error: Option<String>,
}

/// Progress of the AI insight for the current verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InsightState {
    #[default]
    Idle,
    Loading,
    Ready(String),
}

/// Verify screen state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyState {
    /// The id being typed.
    pub input: String,
    /// The id the displayed result belongs to.
    pub verified_id: String,
    pub pending: bool,
    pub result: Option<VerificationResult>,
    pub insight: InsightState,
    /// Bumped on every verification; stale async results are discarded.
    generation: u64,
}

impl VerifyState {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Identifies one verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyTicket {
    pub id: String,
    pub generation: u64,
}

/// Everything the UI renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    view: ViewState,
    role: Role,
    pub config: AppConfig,
    block_height: u64,
    pub issue: IssueState,
    pub verify: VerifyState,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// The screen last navigated to.
    pub fn view(&self) -> ViewState {
        self.view
    }

    /// The screen to actually render: Issue falls back to Home unless the
    /// role is admin.
    pub fn visible_view(&self) -> ViewState {
        if self.view.allows(self.role) {
            self.view
        } else {
            ViewState::Home
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Switch screens. Opening Issue without the admin role is refused and
    /// leaves the view unchanged; returns whether the view changed.
    pub fn navigate(&mut self, view: ViewState) -> bool {
        if !view.allows(self.role) {
            return false;
        }
        self.view = view;
        true
    }

    /// Flip the role. Dropping to verifier while on Issue goes Home.
    pub fn toggle_role(&mut self) -> Role {
        let role = self.role.toggled();
        self.set_role(role);
        role
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        if !self.view.allows(role) {
            self.view = ViewState::Home;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration & status
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the configuration; returns whether the RPC URL changed.
    ///
    /// A new URL points at another node, so the block height starts over.
    pub fn set_config(&mut self, config: AppConfig) -> bool {
        let url_changed = self.config.rpc_url != config.rpc_url;
        self.config = config;
        if url_changed {
            self.block_height = 0;
        }
        url_changed
    }

    /// Record the node's height. A non-zero height below the current one
    /// is a late answer and is dropped; 0 (unreachable) always applies.
    pub fn set_block_height(&mut self, height: u64) {
        if height == 0 || height >= self.block_height {
            self.block_height = height;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Issuance
    // ─────────────────────────────────────────────────────────────────────────

    /// Start an issuance: clear the previous outcome and validate the form.
    ///
    /// On success the issue is marked pending and the certificate to submit
    /// is returned. A validation failure is recorded as the inline error.
    pub fn begin_issue(&mut self) -> Result<Certificate> {
        if self.role != Role::Admin {
            return Err(AppError::NotAuthorized("issuing requires the admin role".into()));
        }

        self.issue.error = None;
        self.issue.receipt = None;

        match self.issue.form.validate() {
            Ok(cert) => {
                self.issue.pending = true;
                Ok(cert)
            }
            Err(err) => {
                self.issue.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Record the outcome of a submitted issuance. Success clears the form.
    pub fn finish_issue(&mut self, outcome: std::result::Result<TxReceiptInfo, String>) {
        self.issue.pending = false;
        match outcome {
            Ok(receipt) => {
                self.issue.receipt = Some(receipt);
                self.issue.form.clear();
            }
            Err(message) => self.issue.error = Some(message),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Start a verification of the typed id.
    ///
    /// The previous result and insight are cleared either way. An empty id
    /// starts nothing and returns `None`.
    pub fn begin_verify(&mut self) -> Option<VerifyTicket> {
        self.verify.result = None;
        self.verify.insight = InsightState::Idle;

        if self.verify.input.is_empty() {
            return None;
        }

        self.verify.generation += 1;
        self.verify.pending = true;
        self.verify.verified_id = self.verify.input.clone();

        Some(VerifyTicket {
            id: self.verify.input.clone(),
            generation: self.verify.generation,
        })
    }

    /// Record a verification result.
    ///
    /// Returns true when the result is valid and current, meaning an insight
    /// should now be requested; the insight is then marked loading.
    pub fn finish_verify(&mut self, ticket: &VerifyTicket, result: VerificationResult) -> bool {
        if ticket.generation != self.verify.generation {
            return false;
        }

        self.verify.pending = false;
        let valid = result.is_valid();
        self.verify.result = Some(result);
        if valid {
            self.verify.insight = InsightState::Loading;
        }
        valid
    }

    /// Store an insight if it still belongs to the displayed verification.
    pub fn apply_insight(&mut self, generation: u64, text: String) -> bool {
        if generation != self.verify.generation || self.verify.insight != InsightState::Loading {
            return false;
        }
        self.verify.insight = InsightState::Ready(text);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certverify_core::ValidationError;

    fn alice_form() -> IssueRequest {
        IssueRequest {
            id: "2024-CS-001".into(),
            name: "Alice Johnson".into(),
            course: "B.Sc CS".into(),
            issue_date: "2024-05-01".into(),
            expiry_date: String::new(),
        }
    }

    fn alice() -> Certificate {
        alice_form().validate().unwrap()
    }

    fn receipt() -> TxReceiptInfo {
        TxReceiptInfo {
            hash: "0xabc".into(),
            block_number: 2,
            gas_used: "21000".into(),
            effective_gas_price: "1.0".into(),
            from: "0xf39f".into(),
            to: "0x5fbd".into(),
        }
    }

    #[test]
    fn test_defaults() {
        let session = Session::default();
        assert_eq!(session.view(), ViewState::Home);
        assert_eq!(session.role(), Role::Verifier);
        assert_eq!(session.block_height(), 0);
    }

    #[test]
    fn test_verifier_cannot_open_issue() {
        let mut session = Session::default();
        assert!(!session.navigate(ViewState::Issue));
        assert_eq!(session.view(), ViewState::Home);

        assert!(session.navigate(ViewState::Verify));
        assert!(!session.navigate(ViewState::Issue));
        assert_eq!(session.view(), ViewState::Verify);
    }

    #[test]
    fn test_toggle_to_verifier_on_issue_goes_home() {
        let mut session = Session::default().with_role(Role::Admin);
        assert!(session.navigate(ViewState::Issue));

        assert_eq!(session.toggle_role(), Role::Verifier);
        assert_eq!(session.view(), ViewState::Home);
    }

    #[test]
    fn test_toggle_elsewhere_keeps_view() {
        let mut session = Session::default().with_role(Role::Admin);
        session.navigate(ViewState::Settings);
        session.toggle_role();
        assert_eq!(session.view(), ViewState::Settings);
        session.toggle_role();
        assert_eq!(session.role(), Role::Admin);
    }

    #[test]
    fn test_visible_view_rechecks_role() {
        let mut session = Session::default().with_role(Role::Admin);
        session.navigate(ViewState::Issue);
        // Bypass the transition guard to exercise the render-time check.
        session.role = Role::Verifier;
        assert_eq!(session.view(), ViewState::Issue);
        assert_eq!(session.visible_view(), ViewState::Home);
    }

    #[test]
    fn test_begin_issue_validation_error_is_inline() {
        let mut session = Session::default().with_role(Role::Admin);
        session.issue.form.name = "Alice".into();

        let err = session.begin_issue().unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::MissingFields(_))));
        assert_eq!(
            session.issue.error.as_deref(),
            Some("Please fill in all required fields (ID, Name, Course, Issue Date)")
        );
        assert!(!session.issue.pending);
    }

    #[test]
    fn test_begin_issue_requires_admin() {
        let mut session = Session::default();
        session.issue.form = alice_form();
        assert!(matches!(session.begin_issue(), Err(AppError::NotAuthorized(_))));
    }

    #[test]
    fn test_issue_success_clears_form() {
        let mut session = Session::default().with_role(Role::Admin);
        session.issue.form = alice_form();
        session.issue.error = Some("old".into());

        let cert = session.begin_issue().unwrap();
        assert_eq!(cert, alice());
        assert!(session.issue.pending);
        assert!(session.issue.error.is_none());

        session.finish_issue(Ok(receipt()));
        assert!(!session.issue.pending);
        assert_eq!(session.issue.receipt, Some(receipt()));
        assert_eq!(session.issue.form, IssueRequest::default());
    }

    #[test]
    fn test_issue_failure_keeps_form() {
        let mut session = Session::default().with_role(Role::Admin);
        session.issue.form = alice_form();
        session.begin_issue().unwrap();

        session.finish_issue(Err("execution reverted".into()));
        assert_eq!(session.issue.error.as_deref(), Some("execution reverted"));
        assert_eq!(session.issue.form, alice_form());
        assert!(session.issue.receipt.is_none());
    }

    #[test]
    fn test_verify_empty_id_is_noop() {
        let mut session = Session::default();
        assert!(session.begin_verify().is_none());
        assert!(!session.verify.pending);
    }

    #[test]
    fn test_verify_valid_starts_insight() {
        let mut session = Session::default();
        session.verify.input = "2024-CS-001".into();

        let ticket = session.begin_verify().unwrap();
        assert!(session.verify.pending);
        assert!(session.finish_verify(&ticket, VerificationResult::Valid(alice())));
        assert_eq!(session.verify.insight, InsightState::Loading);

        assert!(session.apply_insight(ticket.generation, "Immutable.".into()));
        assert_eq!(session.verify.insight, InsightState::Ready("Immutable.".into()));
    }

    #[test]
    fn test_verify_not_found_has_no_insight() {
        let mut session = Session::default();
        session.verify.input = "missing".into();

        let ticket = session.begin_verify().unwrap();
        assert!(!session.finish_verify(&ticket, VerificationResult::NotFound));
        assert_eq!(session.verify.insight, InsightState::Idle);
        assert_eq!(session.verify.result, Some(VerificationResult::NotFound));
    }

    #[test]
    fn test_stale_insight_is_discarded() {
        let mut session = Session::default();
        session.verify.input = "2024-CS-001".into();
        let first = session.begin_verify().unwrap();
        session.finish_verify(&first, VerificationResult::Valid(alice()));

        // A second verification starts before the first insight lands.
        let second = session.begin_verify().unwrap();
        assert!(!session.apply_insight(first.generation, "late".into()));
        assert_eq!(session.verify.insight, InsightState::Idle);

        session.finish_verify(&second, VerificationResult::Valid(alice()));
        assert!(session.apply_insight(second.generation, "fresh".into()));
    }

    #[test]
    fn test_set_config_reports_url_change() {
        let mut session = Session::default();
        let mut config = session.config.clone();
        config.contract_address = "0x1234".into();
        assert!(!session.set_config(config.clone()));

        config.rpc_url = "http://10.0.0.2:8545".into();
        assert!(session.set_config(config));
    }

    #[test]
    fn test_block_height_never_moves_back() {
        let mut session = Session::default();
        session.set_block_height(7);
        session.set_block_height(5);
        assert_eq!(session.block_height(), 7);

        session.set_block_height(9);
        assert_eq!(session.block_height(), 9);

        // Offline reads as zero and shows "Syncing...".
        session.set_block_height(0);
        assert_eq!(session.block_height(), 0);
        session.set_block_height(4);
        assert_eq!(session.block_height(), 4);
    }

    #[test]
    fn test_new_rpc_url_resets_height() {
        let mut session = Session::default();
        session.set_block_height(50);

        let mut config = session.config.clone();
        config.contract_address = "0x1234".into();
        session.set_config(config.clone());
        assert_eq!(session.block_height(), 50);

        config.rpc_url = "http://10.0.0.2:8545".into();
        session.set_config(config);
        assert_eq!(session.block_height(), 0);
        session.set_block_height(3);
        assert_eq!(session.block_height(), 3);
    }

    #[test]
    fn test_parse_view_and_role() {
        assert_eq!("Verify".parse::<ViewState>().unwrap(), ViewState::Verify);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
    }
}

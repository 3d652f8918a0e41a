//! Presentation layer: a pure mapping from [`Session`] to a view tree.
//!
//! Rendering never touches the network and never mutates state, so the
//! same session always renders the same screen.

use certverify_core::constants::{
    ADMIN_NOTICE, APP_SUBTITLE, APP_TITLE, NETWORK_LABEL, VERIFIER_HINT,
};
use certverify_core::{AppConfig, TxReceiptInfo, VerificationResult};

use crate::session::{InsightState, Role, Session, ViewState};

pub const SUBMIT_LABEL: &str = "Issue Certificate (As Admin)";
pub const SUBMIT_PENDING_LABEL: &str = "Minting Certificate...";
pub const VERIFY_LABEL: &str = "Verify";
pub const VERIFY_PENDING_LABEL: &str = "Verifying...";
pub const NEVER_EXPIRES: &str = "Never";
pub const NO_INSIGHT: &str = "No insight available.";
pub const SYNCING: &str = "Syncing...";

/// A full screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub navbar: Navbar,
    pub main: MainView,
    pub footer: Footer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navbar {
    pub title: &'static str,
    pub items: Vec<NavItem>,
    pub role_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub target: ViewState,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainView {
    Home(HomeView),
    Issue(IssueView),
    Verify(VerifyView),
    Settings(SettingsView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub actions: Vec<NavItem>,
    /// Shown to verifiers only.
    pub hint: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueView {
    pub notice: &'static str,
    pub fields: Vec<FormField>,
    pub submit: Button,
    pub error: Option<String>,
    pub receipt: Option<ReceiptPanel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptPanel {
    pub hash: String,
    /// Rendered as `#<n>`.
    pub block: String,
    pub gas_used: String,
    pub from: String,
}

impl From<&TxReceiptInfo> for ReceiptPanel {
    fn from(receipt: &TxReceiptInfo) -> Self {
        Self {
            hash: receipt.hash.clone(),
            block: format!("#{}", receipt.block_number),
            gas_used: receipt.gas_used.clone(),
            from: receipt.from.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyView {
    pub input: FormField,
    pub submit: Button,
    pub result: Option<VerifyPanel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyPanel {
    Valid {
        name: String,
        id: String,
        course: String,
        issued_on: String,
        expires_on: String,
        insight: InsightPanel,
    },
    NotFound {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightPanel {
    Loading,
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    pub fields: Vec<FormField>,
    pub defaults: AppConfig,
    pub back: NavItem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub copyright: String,
    pub block: BlockBadge,
    pub network: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockBadge {
    Block(u64),
    Syncing,
}

impl BlockBadge {
    pub fn from_height(height: u64) -> Self {
        if height == 0 {
            BlockBadge::Syncing
        } else {
            BlockBadge::Block(height)
        }
    }

    pub fn label(&self) -> String {
        match self {
            BlockBadge::Block(n) => format!("Block: #{n}"),
            BlockBadge::Syncing => SYNCING.to_string(),
        }
    }
}

/// Render the session. `year` is only used for the footer.
pub fn render(session: &Session, year: i32) -> Screen {
    let view = session.visible_view();
    Screen {
        navbar: navbar(session.role(), view),
        main: match view {
            ViewState::Home => MainView::Home(home(session.role())),
            ViewState::Issue => MainView::Issue(issue(session)),
            ViewState::Verify => MainView::Verify(verify(session)),
            ViewState::Settings => MainView::Settings(settings(&session.config)),
        },
        footer: Footer {
            copyright: format!("© {year} {APP_TITLE}"),
            block: BlockBadge::from_height(session.block_height()),
            network: format!("Network: {NETWORK_LABEL}"),
        },
    }
}

fn item(label: &'static str, target: ViewState, current: ViewState) -> NavItem {
    NavItem {
        label,
        target,
        active: target == current,
    }
}

fn navbar(role: Role, current: ViewState) -> Navbar {
    let mut items = vec![
        item("Home", ViewState::Home, current),
        item("Verify", ViewState::Verify, current),
    ];
    if role == Role::Admin {
        items.push(item("Issue (Admin)", ViewState::Issue, current));
    }
    items.push(item("Settings", ViewState::Settings, current));

    Navbar {
        title: APP_TITLE,
        items,
        role_label: format!("Role: {role}"),
    }
}

fn home(role: Role) -> HomeView {
    let mut actions = vec![item("Verify a Certificate", ViewState::Verify, ViewState::Home)];
    let hint = match role {
        Role::Admin => {
            actions.push(item("Issue Certificate", ViewState::Issue, ViewState::Home));
            None
        }
        Role::Verifier => Some(VERIFIER_HINT),
    };

    HomeView {
        title: APP_TITLE,
        subtitle: APP_SUBTITLE,
        actions,
        hint,
    }
}

fn field(label: &'static str, value: &str, required: bool) -> FormField {
    FormField {
        label,
        value: value.to_string(),
        required,
    }
}

fn issue(session: &Session) -> IssueView {
    let state = &session.issue;
    let form = &state.form;

    IssueView {
        notice: ADMIN_NOTICE,
        fields: vec![
            field("Certificate ID", &form.id, true),
            field("Student Name", &form.name, true),
            field("Course", &form.course, true),
            field("Issue Date", &form.issue_date, true),
            field("Expiry Date", &form.expiry_date, false),
        ],
        submit: Button {
            label: if state.pending {
                SUBMIT_PENDING_LABEL
            } else {
                SUBMIT_LABEL
            },
            loading: state.pending,
        },
        error: state.error.clone(),
        receipt: state.receipt.as_ref().map(ReceiptPanel::from),
    }
}

fn verify(session: &Session) -> VerifyView {
    let state = &session.verify;

    let result = state.result.as_ref().map(|result| match result {
        VerificationResult::Valid(cert) => VerifyPanel::Valid {
            name: cert.name.clone(),
            id: cert.id.clone(),
            course: cert.course.clone(),
            issued_on: cert.issue_date.clone(),
            expires_on: cert.expiry().unwrap_or(NEVER_EXPIRES).to_string(),
            insight: match &state.insight {
                InsightState::Loading => InsightPanel::Loading,
                InsightState::Ready(text) if !text.is_empty() => InsightPanel::Text(text.clone()),
                _ => InsightPanel::Text(NO_INSIGHT.to_string()),
            },
        },
        VerificationResult::NotFound => VerifyPanel::NotFound {
            message: format!(
                "No record exists on the blockchain for ID: {}",
                state.verified_id
            ),
        },
    });

    VerifyView {
        input: field("Certificate ID", &state.input, true),
        submit: Button {
            label: if state.pending {
                VERIFY_PENDING_LABEL
            } else {
                VERIFY_LABEL
            },
            loading: state.pending,
        },
        result,
    }
}

fn settings(config: &AppConfig) -> SettingsView {
    SettingsView {
        fields: vec![
            field("Contract Address", &config.contract_address, true),
            field("RPC URL", &config.rpc_url, true),
        ],
        defaults: AppConfig::default(),
        back: item("Back to Home", ViewState::Home, ViewState::Settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certverify_core::{Certificate, IssueRequest};

    fn alice() -> Certificate {
        Certificate {
            id: "2024-CS-001".into(),
            name: "Alice Johnson".into(),
            course: "B.Sc CS".into(),
            issue_date: "2024-05-01".into(),
            expiry_date: String::new(),
        }
    }

    fn labels(navbar: &Navbar) -> Vec<&'static str> {
        navbar.items.iter().map(|i| i.label).collect()
    }

    #[test]
    fn test_verifier_navbar_hides_issue() {
        let screen = render(&Session::default(), 2024);
        assert_eq!(labels(&screen.navbar), ["Home", "Verify", "Settings"]);
        assert_eq!(screen.navbar.role_label, "Role: Verifier");

        let MainView::Home(home) = screen.main else {
            panic!("expected home");
        };
        assert_eq!(home.actions.len(), 1);
        assert_eq!(
            home.hint,
            Some("Note: Switch to \"Admin\" role in the navbar to issue certificates.")
        );
    }

    #[test]
    fn test_admin_navbar_shows_issue() {
        let session = Session::default().with_role(Role::Admin);
        let screen = render(&session, 2024);
        assert_eq!(
            labels(&screen.navbar),
            ["Home", "Verify", "Issue (Admin)", "Settings"]
        );
        assert_eq!(screen.navbar.role_label, "Role: Admin");
    }

    #[test]
    fn test_block_badge() {
        let mut session = Session::default();
        assert_eq!(render(&session, 2024).footer.block.label(), "Syncing...");

        session.set_block_height(42);
        let footer = render(&session, 2024).footer;
        assert_eq!(footer.block.label(), "Block: #42");
        assert_eq!(footer.network, "Network: Local Hardhat");
        assert_eq!(footer.copyright, "© 2024 CertVerify");
    }

    #[test]
    fn test_submit_label_follows_pending() {
        let mut session = Session::default().with_role(Role::Admin);
        session.navigate(ViewState::Issue);
        session.issue.form = IssueRequest {
            id: "1".into(),
            name: "n".into(),
            course: "c".into(),
            issue_date: "d".into(),
            expiry_date: String::new(),
        };

        let MainView::Issue(view) = render(&session, 2024).main else {
            panic!("expected issue");
        };
        assert_eq!(view.submit.label, "Issue Certificate (As Admin)");
        assert_eq!(
            view.notice,
            "Admin Mode: This action will write data to the blockchain. Ensure your local Hardhat node is running."
        );

        session.begin_issue().unwrap();
        let MainView::Issue(view) = render(&session, 2024).main else {
            panic!("expected issue");
        };
        assert_eq!(view.submit.label, "Minting Certificate...");
        assert!(view.submit.loading);
    }

    #[test]
    fn test_receipt_panel() {
        let receipt = TxReceiptInfo {
            hash: "0xfeed".into(),
            block_number: 3,
            gas_used: "52000".into(),
            effective_gas_price: "1.875".into(),
            from: "0xf39f".into(),
            to: "0x5fbd".into(),
        };
        let panel = ReceiptPanel::from(&receipt);
        assert_eq!(panel.block, "#3");
        assert_eq!(panel.gas_used, "52000");
    }

    #[test]
    fn test_valid_panel_shows_never_and_insight_states() {
        let mut session = Session::default();
        session.navigate(ViewState::Verify);
        session.verify.input = alice().id;
        let ticket = session.begin_verify().unwrap();
        session.finish_verify(&ticket, VerificationResult::Valid(alice()));

        let MainView::Verify(view) = render(&session, 2024).main else {
            panic!("expected verify");
        };
        let Some(VerifyPanel::Valid {
            expires_on,
            insight,
            ..
        }) = view.result
        else {
            panic!("expected valid panel");
        };
        assert_eq!(expires_on, "Never");
        assert_eq!(insight, InsightPanel::Loading);

        session.apply_insight(ticket.generation, "Trustless.".into());
        let MainView::Verify(view) = render(&session, 2024).main else {
            panic!("expected verify");
        };
        assert!(matches!(
            view.result,
            Some(VerifyPanel::Valid { insight: InsightPanel::Text(t), .. }) if t == "Trustless."
        ));
    }

    #[test]
    fn test_not_found_panel_names_id() {
        let mut session = Session::default();
        session.navigate(ViewState::Verify);
        session.verify.input = "FAKE-1".into();
        let ticket = session.begin_verify().unwrap();
        session.finish_verify(&ticket, VerificationResult::NotFound);

        let MainView::Verify(view) = render(&session, 2024).main else {
            panic!("expected verify");
        };
        assert_eq!(
            view.result,
            Some(VerifyPanel::NotFound {
                message: "No record exists on the blockchain for ID: FAKE-1".into()
            })
        );
    }

    #[test]
    fn test_settings_shows_current_and_defaults() {
        let mut session = Session::default();
        session.set_config(AppConfig::new("0xabc", "http://node:8545"));
        session.navigate(ViewState::Settings);

        let MainView::Settings(view) = render(&session, 2024).main else {
            panic!("expected settings");
        };
        assert_eq!(view.fields[0].value, "0xabc");
        assert_eq!(view.fields[1].value, "http://node:8545");
        assert_eq!(view.defaults, AppConfig::default());
        assert_eq!(view.back.target, ViewState::Home);
    }
}

//! Console commands for the terminal front-end.

use certverify_core::AppConfig;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::App;
use crate::error::{AppError, Result};
use crate::session::ViewState;

pub const HELP: &str = "\
Commands:
  go <home|issue|verify|settings>   switch screens
  role                              toggle between admin and verifier
  set <field> <value>               edit the issue form
                                    (id, name, course, issue-date, expiry-date)
  suggest                           suggest a certificate id
  issue                             submit the issue form
  verify [id]                       verify a certificate id
  contract <address>                set the contract address
  rpc <url>                         set the RPC URL
  show                              redraw the screen
  help                              show this help
  quit                              exit";

/// An editable issue form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Id,
    Name,
    Course,
    IssueDate,
    ExpiryDate,
}

impl FormField {
    fn parse(s: &str) -> Result<Self> {
        match s {
            "id" => Ok(FormField::Id),
            "name" => Ok(FormField::Name),
            "course" => Ok(FormField::Course),
            "issue-date" => Ok(FormField::IssueDate),
            "expiry-date" => Ok(FormField::ExpiryDate),
            other => Err(AppError::InvalidCommand(format!("unknown field: {other}"))),
        }
    }
}

/// What a command leaves for the console.
#[derive(Debug, Default)]
pub struct Reply {
    /// Printed above the screen.
    pub message: Option<String>,
    /// Background work that changes the screen when it finishes.
    pub pending: Option<JoinHandle<()>>,
}

impl Reply {
    fn say(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            pending: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(ViewState),
    ToggleRole,
    Set(FormField, String),
    Suggest,
    Issue,
    Verify(Option<String>),
    Contract(String),
    Rpc(String),
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Values keep their inner spaces.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let required = |what: &str| {
            if rest.is_empty() {
                Err(AppError::InvalidCommand(format!("{word} needs {what}")))
            } else {
                Ok(rest.to_string())
            }
        };

        match word {
            "go" => Ok(Command::Go(required("a view")?.parse()?)),
            "role" => Ok(Command::ToggleRole),
            "set" => {
                let args = required("a field and a value")?;
                let (field, value) = args.split_once(char::is_whitespace).unwrap_or((args.as_str(), ""));
                Ok(Command::Set(FormField::parse(field)?, value.trim().to_string()))
            }
            "suggest" => Ok(Command::Suggest),
            "issue" => Ok(Command::Issue),
            "verify" => Ok(Command::Verify((!rest.is_empty()).then(|| rest.to_string()))),
            "contract" => Ok(Command::Contract(required("an address")?)),
            "rpc" => Ok(Command::Rpc(required("a url")?)),
            "show" | "" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(AppError::InvalidCommand(format!("unknown command: {other}"))),
        }
    }

    /// Run the command.
    ///
    /// Returns without waiting for background work: a verification's
    /// insight is handed back in [`Reply::pending`] while the screen shows
    /// it loading.
    pub async fn run(self, app: &App) -> Result<Reply> {
        debug!(command = ?self, "running command");
        match self {
            Command::Go(view) => {
                if !app.navigate(view).await {
                    return Err(AppError::NotAuthorized(
                        "switch to the admin role to issue certificates".into(),
                    ));
                }
                Ok(Reply::default())
            }
            Command::ToggleRole => {
                app.toggle_role().await;
                Ok(Reply::default())
            }
            Command::Set(field, value) => {
                app.edit_issue_form(|form| match field {
                    FormField::Id => form.id = value,
                    FormField::Name => form.name = value,
                    FormField::Course => form.course = value,
                    FormField::IssueDate => form.issue_date = value,
                    FormField::ExpiryDate => form.expiry_date = value,
                })
                .await;
                Ok(Reply::default())
            }
            Command::Suggest => {
                let id = app.suggest_issue_id().await;
                Ok(Reply::say(format!("Suggested id: {id}")))
            }
            Command::Issue => {
                app.navigate(ViewState::Issue).await;
                // The failure is already on the issue screen.
                match app.submit_issue().await {
                    Ok(receipt) => Ok(Reply::say(format!(
                        "Issued in block #{}",
                        receipt.block_number
                    ))),
                    Err(err @ AppError::NotAuthorized(_)) => Err(err),
                    Err(_) => Ok(Reply::default()),
                }
            }
            Command::Verify(id) => {
                app.navigate(ViewState::Verify).await;
                if let Some(id) = id {
                    app.set_verify_input(id).await;
                }
                let Some(outcome) = app.submit_verify().await else {
                    return Ok(Reply::say("Enter a certificate id to verify."));
                };
                Ok(Reply {
                    message: None,
                    pending: outcome.insight,
                })
            }
            Command::Contract(address) => {
                let mut config = app.snapshot().await.config;
                config.contract_address = address;
                app.update_config(config).await;
                Ok(Reply::default())
            }
            Command::Rpc(url) => {
                let config = AppConfig {
                    rpc_url: url,
                    ..app.snapshot().await.config
                };
                app.update_config(config).await;
                Ok(Reply::default())
            }
            Command::Show | Command::Quit => Ok(Reply::default()),
            Command::Help => Ok(Reply::say(HELP)),
        }
    }
}

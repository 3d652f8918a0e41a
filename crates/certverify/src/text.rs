//! Plain-text rendering of the view tree for the terminal front-end.

use std::fmt::{self, Display, Formatter};

use crate::view::{
    BlockBadge, Footer, FormField, HomeView, InsightPanel, IssueView, MainView, Navbar, Screen,
    SettingsView, VerifyPanel, VerifyView,
};

const RULE: &str = "----------------------------------------------------------------";

impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.navbar)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "{}", self.main)?;
        writeln!(f, "{RULE}")?;
        write!(f, "{}", self.footer)
    }
}

impl Display for Navbar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} |", self.title)?;
        for item in &self.items {
            if item.active {
                write!(f, " [{}]", item.label)?;
            } else {
                write!(f, " {}", item.label)?;
            }
        }
        write!(f, " | {}", self.role_label)
    }
}

impl Display for MainView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MainView::Home(view) => Display::fmt(view, f),
            MainView::Issue(view) => Display::fmt(view, f),
            MainView::Verify(view) => Display::fmt(view, f),
            MainView::Settings(view) => Display::fmt(view, f),
        }
    }
}

impl Display for FormField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let marker = if self.required { "*" } else { "" };
        write!(f, "  {}{}: {}", self.label, marker, self.value)
    }
}

impl Display for HomeView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.subtitle)?;
        for action in &self.actions {
            writeln!(f, "  > {}", action.label)?;
        }
        if let Some(hint) = self.hint {
            write!(f, "{hint}")?;
        }
        Ok(())
    }
}

impl Display for IssueView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Issue Certificate")?;
        writeln!(f, "{}", self.notice)?;
        for field in &self.fields {
            writeln!(f, "{field}")?;
        }
        write!(f, "  [{}]", self.submit.label)?;
        if let Some(error) = &self.error {
            write!(f, "\nError: {error}")?;
        }
        if let Some(receipt) = &self.receipt {
            write!(f, "\nCertificate issued")?;
            write!(f, "\n  Transaction: {}", receipt.hash)?;
            write!(f, "\n  Block: {}", receipt.block)?;
            write!(f, "\n  Gas used: {}", receipt.gas_used)?;
            write!(f, "\n  From: {}", receipt.from)?;
        }
        Ok(())
    }
}

impl Display for VerifyView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Verify Certificate")?;
        writeln!(f, "{}", self.input)?;
        write!(f, "  [{}]", self.submit.label)?;
        match &self.result {
            Some(VerifyPanel::Valid {
                name,
                id,
                course,
                issued_on,
                expires_on,
                insight,
            }) => {
                write!(f, "\nVALID CERTIFICATE")?;
                write!(f, "\n  Name: {name}")?;
                write!(f, "\n  ID: {id}")?;
                write!(f, "\n  Course: {course}")?;
                write!(f, "\n  Issued on: {issued_on}")?;
                write!(f, "\n  Expires on: {expires_on}")?;
                match insight {
                    InsightPanel::Loading => write!(f, "\n  AI Insight: generating..."),
                    InsightPanel::Text(text) => write!(f, "\n  AI Insight: {text}"),
                }
            }
            Some(VerifyPanel::NotFound { message }) => {
                write!(f, "\nINVALID CERTIFICATE\n  {message}")
            }
            None => Ok(()),
        }
    }
}

impl Display for SettingsView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Settings")?;
        for field in &self.fields {
            writeln!(f, "{field}")?;
        }
        writeln!(
            f,
            "  Defaults: contract {} at {}",
            self.defaults.contract_address, self.defaults.rpc_url
        )?;
        write!(f, "  > {}", self.back.label)
    }
}

impl Display for BlockBadge {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Display for Footer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.copyright, self.block, self.network)
    }
}

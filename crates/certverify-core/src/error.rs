//! Error types for CertVerify core.

use std::fmt;

use thiserror::Error;

/// Errors that can occur while encoding or decoding contract data.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("abi error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("invalid units: {0}")]
    Units(#[from] alloy_primitives::utils::UnitsError),

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// A required field of the issuance form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Name,
    Course,
    IssueDate,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Id => "ID",
            Field::Name => "Name",
            Field::Course => "Course",
            Field::IssueDate => "Issue Date",
        };
        f.write_str(label)
    }
}

/// Validation errors for issuance input, raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required fields are empty.
    #[error("Please fill in all required fields (ID, Name, Course, Issue Date)")]
    MissingFields(Vec<Field>),
}

//! Issuance input: required-field checks and id suggestions.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Field, ValidationError};
use crate::types::Certificate;

/// Raw issuance input, as typed by the issuer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    pub id: String,
    pub name: String,
    pub course: String,
    pub issue_date: String,
    pub expiry_date: String,
}

impl IssueRequest {
    /// Fields that must be present but are empty, in form order.
    pub fn missing_fields(&self) -> Vec<Field> {
        let mut missing = Vec::new();
        if self.id.is_empty() {
            missing.push(Field::Id);
        }
        if self.name.is_empty() {
            missing.push(Field::Name);
        }
        if self.course.is_empty() {
            missing.push(Field::Course);
        }
        if self.issue_date.is_empty() {
            missing.push(Field::IssueDate);
        }
        missing
    }

    /// Check required fields and produce the certificate to record.
    ///
    /// The expiry date is optional and passed through as given.
    pub fn validate(&self) -> Result<Certificate, ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        Ok(Certificate {
            id: self.id.clone(),
            name: self.name.clone(),
            course: self.course.clone(),
            issue_date: self.issue_date.clone(),
            expiry_date: self.expiry_date.clone(),
        })
    }

    /// Reset every field to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Suggest a certificate id of the form `CERT-<year>-<n>` with `n < 10000`.
///
/// Uniqueness is not checked against the ledger.
pub fn suggest_certificate_id<R: Rng>(year: i32, rng: &mut R) -> String {
    format!("CERT-{}-{}", year, rng.gen_range(0..10_000u32))
}

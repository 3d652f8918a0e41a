//! Prompt construction.

use serde::{Deserialize, Serialize};

/// What the insight is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightRequest {
    pub student_name: String,
    pub cert_id: String,
    pub contract_address: String,
}

impl InsightRequest {
    pub fn new(
        student_name: impl Into<String>,
        cert_id: impl Into<String>,
        contract_address: impl Into<String>,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            cert_id: cert_id.into(),
            contract_address: contract_address.into(),
        }
    }

    /// The natural-language prompt sent to the model.
    ///
    /// The word limit is an instruction to the model only; responses are not
    /// truncated.
    pub fn prompt(&self) -> String {
        format!(
            "You are a blockchain expert assistant for a University.\n\
             A certificate has been verified on the Ethereum blockchain.\n\
             \n\
             Details:\n\
             - Student Name: {}\n\
             - Certificate ID: {}\n\
             - Contract: {}\n\
             \n\
             Please write a short, professional, and congratulatory paragraph \
             explaining why this digital record is secure and immutable.\n\
             Keep it under 60 words. Emphasize the \"trustless\" nature of the verification.",
            self.student_name, self.cert_id, self.contract_address
        )
    }
}

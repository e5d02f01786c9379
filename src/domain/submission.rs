use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter subject or body")]
    EmptySubmission,
}

/// The two free-text fields of the scan form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionInput {
    pub subject: String,
    pub body: String,
}

impl SubmissionInput {
    /// Missing fields read as empty text.
    pub fn from_fields(subject: Option<&str>, body: Option<&str>) -> Self {
        Self {
            subject: subject.unwrap_or_default().to_string(),
            body: body.unwrap_or_default().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.subject.is_empty() && self.body.is_empty() {
            return Err(ValidationError::EmptySubmission);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastEmailSnapshot {
    pub subject: String,
    pub body: String,
}

impl From<&SubmissionInput> for LastEmailSnapshot {
    fn from(input: &SubmissionInput) -> Self {
        Self {
            subject: input.subject.clone(),
            body: input.body.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Epoch milliseconds.
    #[serde(rename = "ts")]
    pub timestamp: i64,
    pub subject: String,
    pub body: String,
    pub verdict: String,
}

pub mod submission;
pub mod types;

pub use submission::{HistoryEntry, LastEmailSnapshot, SubmissionInput, ValidationError};
pub use types::{ClassificationResult, RiskLevel};

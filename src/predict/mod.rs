mod client;
pub mod protocol;

use futures::future::BoxFuture;

use crate::domain::SubmissionInput;

pub use client::PredictClient;
pub use protocol::{FallbackReason, NetworkIssueKind, PredictOutcome};

/// One classification attempt against the prediction endpoint.
///
/// Implementations never retry and never return an error: every failure is
/// folded into [`PredictOutcome::Fallback`].
pub trait ClassificationEndpoint: Send + Sync {
    fn classify<'a>(&'a self, input: &'a SubmissionInput) -> BoxFuture<'a, PredictOutcome>;
}

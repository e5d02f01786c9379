use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{ClassificationResult, SubmissionInput};

pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub subject: &'a str,
    pub body: &'a str,
}

impl<'a> From<&'a SubmissionInput> for PredictRequest<'a> {
    fn from(input: &'a SubmissionInput) -> Self {
        Self {
            subject: &input.subject,
            body: &input.body,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictOutcome {
    Success(ClassificationResult),
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkIssueKind {
    Timeout,
    Connection,
    Decode,
    Other,
}

impl NetworkIssueKind {
    pub fn label(&self) -> &'static str {
        match self {
            NetworkIssueKind::Timeout => "request timed out",
            NetworkIssueKind::Connection => "connection failed",
            NetworkIssueKind::Decode => "malformed response body",
            NetworkIssueKind::Other => "transport error",
        }
    }
}

/// Why the interactive request path was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FallbackReason {
    #[error("endpoint answered {status}")]
    EndpointUnavailable { status: u16 },
    #[error("response content type was {content_type:?}, expected JSON")]
    UnexpectedContentType { content_type: String },
    #[error("{}: {detail}", .kind.label())]
    Transport {
        kind: NetworkIssueKind,
        detail: String,
    },
}

impl FallbackReason {
    pub fn from_transport(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            NetworkIssueKind::Timeout
        } else if err.is_connect() {
            NetworkIssueKind::Connection
        } else if err.is_decode() {
            NetworkIssueKind::Decode
        } else {
            NetworkIssueKind::Other
        };
        FallbackReason::Transport {
            kind,
            detail: err.to_string(),
        }
    }
}

/// Status and content type decide whether the body is worth decoding.
/// Any status other than 404/405 is accepted, so a JSON error payload with a
/// 500 still reaches the caller.
pub fn check_response(status: StatusCode, content_type: &str) -> Result<(), FallbackReason> {
    if matches!(
        status,
        StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED
    ) {
        return Err(FallbackReason::EndpointUnavailable {
            status: status.as_u16(),
        });
    }
    if !content_type.contains(JSON_CONTENT_TYPE) {
        return Err(FallbackReason::UnexpectedContentType {
            content_type: content_type.to_string(),
        });
    }
    Ok(())
}

//! Error types raised by the LLM gateway and their retry classification.

use reqwest::StatusCode;
use thiserror::Error;

use super::retry::TransientKind;

/// Failures that can occur while grading through the external model.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build LLM client")]
    ClientBuilder {
        /// Underlying client construction failure.
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent or timed out in flight.
    #[error("failed to send LLM request")]
    RequestSend {
        /// Underlying transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// The provider answered with a non-success status.
    #[error("LLM provider returned status {status}: {body}")]
    Status {
        /// HTTP status returned by the provider.
        status: StatusCode,
        /// Response body, kept for classification and diagnostics.
        body: String,
    },
    /// The response payload could not be decoded.
    #[error("failed to decode LLM response")]
    Decode {
        /// Underlying decode failure.
        #[source]
        source: reqwest::Error,
    },
    /// The provider returned no completion choices.
    #[error("LLM response contained no completion")]
    EmptyCompletion,
    /// The completion text did not contain a usable score.
    #[error("LLM completion did not contain a score: {content}")]
    UnparsableScore {
        /// Raw completion text returned by the model.
        content: String,
    },
}

impl LlmError {
    /// Classify this error for the retry wrapper. `None` means fatal.
    pub fn transient_kind(&self) -> Option<TransientKind> {
        match self {
            LlmError::RequestSend { source } if source.is_timeout() => {
                Some(TransientKind::TimedOut)
            }
            LlmError::Status { status, body } => classify_status(*status, body),
            _ => None,
        }
    }
}

/// Map a provider status and body onto the closed set of transient failures.
fn classify_status(status: StatusCode, body: &str) -> Option<TransientKind> {
    let body = body.to_ascii_lowercase();
    match status.as_u16() {
        429 => Some(TransientKind::RateLimited),
        503 | 529 => Some(TransientKind::Overloaded),
        408 => Some(TransientKind::TimedOut),
        _ if body.contains("rate limit") => Some(TransientKind::RateLimited),
        _ if body.contains("overloaded") || body.contains("capacity") => {
            Some(TransientKind::Overloaded)
        }
        _ => None,
    }
}

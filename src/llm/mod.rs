//! Gateway to the external language model grading free-text submissions.
//!
//! The only non-trivial behaviour here is the retry wrapper: transient
//! provider failures are retried with exponential backoff and jitter, fatal
//! ones propagate immediately and unchanged.

mod client;
mod config;
mod error;
pub mod retry;

pub use client::{GradedAnswer, LlmClient};
pub use config::LlmConfig;
pub use error::LlmError;
pub use retry::{DEFAULT_MAX_ATTEMPTS, TransientKind, call_with_retry};

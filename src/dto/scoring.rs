//! Request and response schemas for the AI scoring endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Submission payload for `POST /score`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    /// Free-text answer to grade.
    #[validate(required(message = "answer is required"))]
    pub answer: Option<String>,
    /// Optional scenario context shown to the grader.
    pub context: Option<String>,
}

/// Where the returned score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    /// Graded by the external model.
    Ai,
    /// Deterministic heuristic used when the model is unavailable.
    Fallback,
}

/// Grading result for `POST /score`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    /// Numeric score in `[0, 100]`.
    pub score: f64,
    /// Origin of the score.
    pub source: ScoreSource,
    /// Model that produced an AI score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

use axum::{Json, Router, extract::State, routing::post};
use validator::Validate;

use crate::{
    dto::scoring::{ScoreRequest, ScoreResponse},
    error::AppError,
    services::scoring_service,
    state::SharedState,
};

/// Scoring endpoint grading free-text submissions.
pub fn router() -> Router<SharedState> {
    Router::new().route("/score", post(score_answer))
}

#[utoipa::path(
    post,
    path = "/score",
    tag = "scoring",
    request_body = ScoreRequest,
    responses(
        (status = 200, description = "AI or fallback score", body = ScoreResponse),
        (status = 400, description = "Missing answer")
    )
)]
/// Grade a submission, falling back to the deterministic heuristic when the
/// model is unavailable.
pub async fn score_answer(
    State(state): State<SharedState>,
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    payload.validate()?;
    let answer = payload.answer.unwrap_or_default();

    let response =
        scoring_service::score_submission(&state, &answer, payload.context.as_deref()).await;
    Ok(Json(response))
}

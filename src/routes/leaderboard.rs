use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::leaderboard::{
        LeaderboardQuery, LeaderboardResponse, ResetSignalQuery, ResetSignalResponse,
        SubmitScoreRequest, SubmitScoreResponse,
    },
    error::AppError,
    services::leaderboard_service,
    state::SharedState,
};

/// Public endpoints for reading boards and submitting scores.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/leaderboard", get(get_leaderboard).post(submit_score))
        .route("/reset-signal", get(get_reset_signal))
}

#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "leaderboard",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Board sorted by total score", body = LeaderboardResponse),
        (status = 400, description = "Missing room parameter")
    )
)]
/// Return a room's leaderboard sorted by total score, highest first.
pub async fn get_leaderboard(
    State(state): State<SharedState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let Some(room) = query.room else {
        return Err(AppError::BadRequest("missing required field: room".into()));
    };

    let board = leaderboard_service::read_board(&state, &room).await?;
    Ok(Json(LeaderboardResponse {
        leaderboard: board.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/leaderboard",
    tag = "leaderboard",
    request_body = SubmitScoreRequest,
    responses(
        (status = 200, description = "Score recorded", body = SubmitScoreResponse),
        (status = 400, description = "Missing or malformed fields")
    )
)]
/// Record a team's score for one round and return the updated board.
pub async fn submit_score(
    State(state): State<SharedState>,
    Json(payload): Json<SubmitScoreRequest>,
) -> Result<Json<SubmitScoreResponse>, AppError> {
    payload.validate()?;
    let submission = payload.into_submission().map_err(AppError::from)?;

    let board = leaderboard_service::submit_score(&state, submission).await?;
    Ok(Json(SubmitScoreResponse {
        success: true,
        leaderboard: board.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/reset-signal",
    tag = "leaderboard",
    params(ResetSignalQuery),
    responses(
        (status = 200, description = "Pending reset signal, if any", body = ResetSignalResponse),
        (status = 400, description = "Missing teamKey parameter")
    )
)]
/// Return the pending reset signal for a team, if one has not expired.
pub async fn get_reset_signal(
    State(state): State<SharedState>,
    Query(query): Query<ResetSignalQuery>,
) -> Result<Json<ResetSignalResponse>, AppError> {
    let Some(team_key) = query.team_key else {
        return Err(AppError::BadRequest(
            "missing required field: teamKey".into(),
        ));
    };

    let reset_signal = leaderboard_service::pending_reset(&state, &team_key).await?;
    Ok(Json(ResetSignalResponse { reset_signal }))
}

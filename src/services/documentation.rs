use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Pitchboard Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::leaderboard::get_leaderboard,
        crate::routes::leaderboard::submit_score,
        crate::routes::leaderboard::get_reset_signal,
        crate::routes::admin::admin_query,
        crate::routes::admin::admin_action,
        crate::routes::score::score_answer,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::leaderboard::SubmitScoreRequest,
            crate::dto::leaderboard::LeaderboardResponse,
            crate::dto::leaderboard::SubmitScoreResponse,
            crate::dto::leaderboard::ResetSignalResponse,
            crate::dto::admin::AdminRequest,
            crate::dto::admin::AdminResponse,
            crate::dto::scoring::ScoreRequest,
            crate::dto::scoring::ScoreResponse,
            crate::dao::models::TeamEntry,
            crate::dao::models::ResetSignal,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "leaderboard", description = "Public leaderboard reads and score submissions"),
        (name = "admin", description = "Privileged room and team management"),
        (name = "scoring", description = "AI grading of free-text submissions"),
    )
)]
pub struct ApiDoc;

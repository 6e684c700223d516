/// Privileged board mutations behind the admin endpoint.
pub mod admin_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Public leaderboard reads and score submissions.
pub mod leaderboard_service;
/// AI grading with heuristic fallback.
pub mod scoring_service;

/// Admin endpoint request/response schemas and action dispatch.
pub mod admin;
/// Schema fragments shared between endpoints.
pub mod common;
/// Health endpoint schema.
pub mod health;
/// Leaderboard endpoint schemas.
pub mod leaderboard;
/// Scoring endpoint schemas.
pub mod scoring;

//! Request and response schemas for the public leaderboard endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    dao::models::{ResetSignal, TeamEntry},
    dto::common::RoundField,
    error::ServiceError,
    services::leaderboard_service::ScoreSubmission,
};

/// Query parameters accepted by `GET /leaderboard`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    /// Room whose leaderboard should be returned.
    pub room: Option<String>,
}

/// Query parameters accepted by `GET /reset-signal`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ResetSignalQuery {
    /// Team key whose pending reset signal should be returned.
    pub team_key: Option<String>,
}

/// Score submission payload for `POST /leaderboard`.
///
/// Every field is required; absent ones are reported by name.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    /// Room the team plays in.
    #[validate(required(message = "room is required"))]
    pub room: Option<String>,
    /// Table identifier within the room.
    #[validate(required(message = "table is required"))]
    pub table: Option<String>,
    /// Display name for the team; the latest submission wins.
    #[validate(required(message = "teamName is required"))]
    pub team_name: Option<String>,
    /// Round the score belongs to.
    #[validate(required(message = "roundId is required"))]
    pub round_id: Option<RoundField>,
    /// Score achieved in that round.
    #[validate(required(message = "score is required"))]
    pub score: Option<f64>,
}

impl SubmitScoreRequest {
    /// Convert the validated payload into a submission for the service layer.
    pub fn into_submission(self) -> Result<ScoreSubmission, ServiceError> {
        let missing = |field: &str| ServiceError::InvalidInput(format!("missing required field: {field}"));

        let round = self
            .round_id
            .ok_or_else(|| missing("roundId"))?
            .as_round()
            .and_then(|value| u8::try_from(value).ok())
            .filter(|value| *value >= 1)
            .ok_or_else(|| {
                ServiceError::InvalidInput("roundId must be a positive integer".into())
            })?;

        Ok(ScoreSubmission {
            room: self.room.ok_or_else(|| missing("room"))?,
            table: self.table.ok_or_else(|| missing("table"))?,
            team_name: self.team_name.ok_or_else(|| missing("teamName"))?,
            round,
            score: self.score.ok_or_else(|| missing("score"))?,
        })
    }
}

/// One ranked row of the public leaderboard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    /// The stored team record.
    #[serde(flatten)]
    pub entry: TeamEntry,
    /// Sum of every round score, the ranking criterion.
    pub total_score: f64,
}

impl From<TeamEntry> for TeamStanding {
    fn from(entry: TeamEntry) -> Self {
        let total_score = entry.total_score();
        Self { entry, total_score }
    }
}

/// Response for `GET /leaderboard`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    /// Teams sorted by total score, highest first.
    pub leaderboard: Vec<TeamStanding>,
}

/// Response for `POST /leaderboard`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitScoreResponse {
    /// Always true on success.
    pub success: bool,
    /// The room's board after the submission, sorted.
    pub leaderboard: Vec<TeamStanding>,
}

/// Response for `GET /reset-signal`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetSignalResponse {
    /// Pending reset signal for the team, if any.
    pub reset_signal: Option<ResetSignal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> SubmitScoreRequest {
        SubmitScoreRequest {
            room: Some("5".into()),
            table: Some("2".into()),
            team_name: Some("Sharks".into()),
            round_id: Some(RoundField::Number(3)),
            score: Some(42.0),
        }
    }

    #[test]
    fn complete_payloads_convert_to_submissions() {
        let submission = full_request().into_submission().unwrap();
        assert_eq!(submission.room, "5");
        assert_eq!(submission.round, 3);
        assert_eq!(submission.score, 42.0);
    }

    #[test]
    fn string_round_ids_are_accepted() {
        let mut request = full_request();
        request.round_id = Some(RoundField::Text("2".into()));
        assert_eq!(request.into_submission().unwrap().round, 2);
    }

    #[test]
    fn non_numeric_round_ids_are_rejected() {
        let mut request = full_request();
        request.round_id = Some(RoundField::Text("finals".into()));
        assert!(request.into_submission().is_err());
    }

    #[test]
    fn missing_fields_fail_validation_by_name() {
        let mut request = full_request();
        request.team_name = None;
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("team_name"));
    }
}

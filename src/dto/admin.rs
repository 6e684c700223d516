//! Request and response schemas for the admin endpoint.
//!
//! The endpoint multiplexes privileged operations through an `action` field;
//! the raw request is parsed into a closed [`AdminCommand`] before dispatch.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    dao::models::TeamEntry, dto::common::RoundField, error::ServiceError,
};

/// Actions understood by the admin endpoint, in the order they are reported
/// back on an unrecognized action.
pub const VALID_ACTIONS: &[&str] = &[
    "list-rooms",
    "get-room",
    "clear-room",
    "remove-team",
    "reset-team",
    "reset-to-round",
    "clear-all",
];

/// Raw admin request, accepted both as a JSON body and as query parameters.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AdminRequest {
    /// Operation to perform; one of [`VALID_ACTIONS`].
    pub action: Option<String>,
    /// Room the operation targets, where applicable.
    pub room: Option<String>,
    /// Team the operation targets, where applicable.
    pub team_key: Option<String>,
    /// Round to roll back to for `reset-to-round`.
    pub target_round: Option<RoundField>,
    /// Shared secret when passed as a query parameter instead of a header.
    pub password: Option<String>,
}

/// Validated admin operation ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    /// Enumerate rooms with a stored board.
    ListRooms,
    /// Return a room's raw stored board.
    GetRoom {
        /// Targeted room.
        room: String,
    },
    /// Delete a room's board.
    ClearRoom {
        /// Targeted room.
        room: String,
    },
    /// Remove one team from a room's board.
    RemoveTeam {
        /// Targeted room.
        room: String,
        /// Team to remove.
        team_key: String,
    },
    /// Zero a team's scores, keeping the entry.
    ResetTeam {
        /// Targeted room.
        room: String,
        /// Team to reset.
        team_key: String,
    },
    /// Roll a team back to an earlier round and signal its client.
    ResetToRound {
        /// Targeted room.
        room: String,
        /// Team to roll back.
        team_key: String,
        /// Round the team must resume from, in `[1, 4]`.
        target_round: u8,
    },
    /// Delete every room board.
    ClearAll,
}

impl AdminRequest {
    /// Parse the raw request into a command, naming whatever is missing.
    pub fn into_command(self) -> Result<AdminCommand, ServiceError> {
        let missing =
            |field: &str| ServiceError::InvalidInput(format!("missing required field: {field}"));

        let action = self.action.ok_or_else(|| missing("action"))?;

        match action.as_str() {
            "list-rooms" => Ok(AdminCommand::ListRooms),
            "get-room" => Ok(AdminCommand::GetRoom {
                room: self.room.ok_or_else(|| missing("room"))?,
            }),
            "clear-room" => Ok(AdminCommand::ClearRoom {
                room: self.room.ok_or_else(|| missing("room"))?,
            }),
            "remove-team" => Ok(AdminCommand::RemoveTeam {
                room: self.room.ok_or_else(|| missing("room"))?,
                team_key: self.team_key.ok_or_else(|| missing("teamKey"))?,
            }),
            "reset-team" => Ok(AdminCommand::ResetTeam {
                room: self.room.ok_or_else(|| missing("room"))?,
                team_key: self.team_key.ok_or_else(|| missing("teamKey"))?,
            }),
            "reset-to-round" => {
                let target_round = self
                    .target_round
                    .ok_or_else(|| missing("targetRound"))?
                    .as_round()
                    .filter(|round| (1..=4).contains(round))
                    .ok_or_else(|| {
                        ServiceError::InvalidInput(
                            "targetRound must be an integer between 1 and 4".into(),
                        )
                    })?;

                Ok(AdminCommand::ResetToRound {
                    room: self.room.ok_or_else(|| missing("room"))?,
                    team_key: self.team_key.ok_or_else(|| missing("teamKey"))?,
                    target_round: target_round as u8,
                })
            }
            "clear-all" => Ok(AdminCommand::ClearAll),
            other => Err(ServiceError::InvalidInput(format!(
                "unknown action `{other}`; valid actions: {}",
                VALID_ACTIONS.join(", ")
            ))),
        }
    }
}

/// Room identifiers returned by `list-rooms`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomListResponse {
    /// Always true on success.
    pub success: bool,
    /// Rooms that currently have a stored board.
    pub rooms: Vec<String>,
}

/// Raw board returned by `get-room`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomBoardResponse {
    /// Always true on success.
    pub success: bool,
    /// Targeted room.
    pub room: String,
    /// Raw stored board in storage order.
    pub leaderboard: Vec<TeamEntry>,
}

/// Updated board returned by the team mutation actions.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardResponse {
    /// Always true on success.
    pub success: bool,
    /// Board after the mutation, in storage order.
    pub leaderboard: Vec<TeamEntry>,
}

/// Count returned by `clear-all`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClearAllResponse {
    /// Always true on success.
    pub success: bool,
    /// Number of room boards deleted.
    pub cleared: usize,
}

/// Bare acknowledgement for actions without a payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct AckResponse {
    /// Always true on success.
    pub success: bool,
}

/// Action-specific admin response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum AdminResponse {
    /// `list-rooms` result.
    Rooms(RoomListResponse),
    /// `get-room` result.
    RoomBoard(RoomBoardResponse),
    /// Team mutation result.
    Board(BoardResponse),
    /// `clear-all` result.
    Cleared(ClearAllResponse),
    /// `clear-room` result.
    Ack(AckResponse),
}

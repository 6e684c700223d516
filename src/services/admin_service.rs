//! Business logic powering the privileged admin endpoint.
//!
//! Every operation here assumes the caller has already been authorized; the
//! route layer checks the shared secret before any command parsing.

use tracing::info;

use crate::{
    dao::models::{ResetSignal, TeamEntry, now_millis},
    dto::admin::{
        AckResponse, AdminCommand, AdminResponse, BoardResponse, ClearAllResponse,
        RoomBoardResponse, RoomListResponse,
    },
    error::ServiceError,
    state::SharedState,
};

/// Compare the provided credential against the configured secret.
///
/// Checked before any other validation; a missing configuration rejects
/// everything.
pub fn authorize(state: &SharedState, provided: Option<&str>) -> Result<(), ServiceError> {
    match (state.admin_password(), provided) {
        (Some(expected), Some(candidate)) if expected == candidate => Ok(()),
        _ => Err(ServiceError::Unauthorized),
    }
}

/// Execute a validated admin command and shape its action-specific response.
pub async fn dispatch(
    state: &SharedState,
    command: AdminCommand,
) -> Result<AdminResponse, ServiceError> {
    match command {
        AdminCommand::ListRooms => {
            let rooms = list_rooms(state).await?;
            Ok(AdminResponse::Rooms(RoomListResponse {
                success: true,
                rooms,
            }))
        }
        AdminCommand::GetRoom { room } => {
            let leaderboard = get_room(state, &room).await?;
            Ok(AdminResponse::RoomBoard(RoomBoardResponse {
                success: true,
                room,
                leaderboard,
            }))
        }
        AdminCommand::ClearRoom { room } => {
            clear_room(state, &room).await?;
            Ok(AdminResponse::Ack(AckResponse { success: true }))
        }
        AdminCommand::RemoveTeam { room, team_key } => {
            let leaderboard = remove_team(state, &room, &team_key).await?;
            Ok(AdminResponse::Board(BoardResponse {
                success: true,
                leaderboard,
            }))
        }
        AdminCommand::ResetTeam { room, team_key } => {
            let leaderboard = reset_team(state, &room, &team_key).await?;
            Ok(AdminResponse::Board(BoardResponse {
                success: true,
                leaderboard,
            }))
        }
        AdminCommand::ResetToRound {
            room,
            team_key,
            target_round,
        } => {
            let leaderboard = reset_to_round(state, &room, &team_key, target_round).await?;
            Ok(AdminResponse::Board(BoardResponse {
                success: true,
                leaderboard,
            }))
        }
        AdminCommand::ClearAll => {
            let cleared = clear_all(state).await?;
            Ok(AdminResponse::Cleared(ClearAllResponse {
                success: true,
                cleared,
            }))
        }
    }
}

/// Rooms that currently have a stored board.
pub async fn list_rooms(state: &SharedState) -> Result<Vec<String>, ServiceError> {
    Ok(state.score_store().list_rooms().await?)
}

/// Raw stored board for a room, empty if none is stored.
pub async fn get_room(state: &SharedState, room: &str) -> Result<Vec<TeamEntry>, ServiceError> {
    Ok(state.score_store().load_board(room).await?)
}

/// Delete a room's board. Clearing an absent room succeeds.
pub async fn clear_room(state: &SharedState, room: &str) -> Result<(), ServiceError> {
    let existed = state.score_store().delete_board(room).await?;
    info!(%room, existed, "cleared room");
    Ok(())
}

/// Remove one team from a room's board. A missing team is a no-op, not an
/// error.
pub async fn remove_team(
    state: &SharedState,
    room: &str,
    team_key: &str,
) -> Result<Vec<TeamEntry>, ServiceError> {
    let store = state.score_store();
    let mut entries = store.load_board(room).await?;

    entries.retain(|entry| entry.team_key != team_key);
    store.save_board(room, entries.clone()).await?;

    Ok(entries)
}

/// Empty a team's scores while keeping its entry and display name.
pub async fn reset_team(
    state: &SharedState,
    room: &str,
    team_key: &str,
) -> Result<Vec<TeamEntry>, ServiceError> {
    let store = state.score_store();
    let mut entries = store.load_board(room).await?;

    if let Some(entry) = entries.iter_mut().find(|entry| entry.team_key == team_key) {
        entry.scores.clear();
        entry.last_updated = now_millis();
    }
    store.save_board(room, entries.clone()).await?;

    Ok(entries)
}

/// Roll a team back so `target_round` and every later round are cleared,
/// leaving earlier rounds intact, and signal the team's client.
///
/// The reset signal is written even when no entry matched: the signal tells a
/// live client session to resume from `target_round`, which is meaningful
/// before the team has recorded any score.
pub async fn reset_to_round(
    state: &SharedState,
    room: &str,
    team_key: &str,
    target_round: u8,
) -> Result<Vec<TeamEntry>, ServiceError> {
    let store = state.score_store();
    let now = now_millis();
    let mut entries = store.load_board(room).await?;

    if let Some(entry) = entries.iter_mut().find(|entry| entry.team_key == team_key) {
        entry.scores.retain(|round, _| *round < target_round);
        entry.phases.retain(|round, _| *round < target_round);
        entry.last_updated = now;
        store.save_board(room, entries.clone()).await?;
    }

    let signal = ResetSignal {
        target_round,
        timestamp: now,
    };
    store
        .put_reset_signal(team_key, signal, state.reset_signal_ttl())
        .await?;
    info!(%room, %team_key, target_round, "reset team to round");

    Ok(entries)
}

/// Delete every room board, returning how many were removed.
pub async fn clear_all(state: &SharedState) -> Result<usize, ServiceError> {
    let store = state.score_store();
    let rooms = store.list_rooms().await?;

    let mut cleared = 0;
    for room in &rooms {
        if store.delete_board(room).await? {
            cleared += 1;
        }
    }
    info!(cleared, "cleared all rooms");

    Ok(cleared)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        config::AppConfig,
        dao::score_store::{ScoreStore, memory::MemoryScoreStore},
        services::leaderboard_service::{ScoreSubmission, submit_score},
        state::AppState,
    };

    use super::*;

    fn state_with_memory_store() -> (SharedState, MemoryScoreStore) {
        let store = MemoryScoreStore::new();
        let state = AppState::new(AppConfig::default(), Arc::new(store.clone()), None);
        (state, store)
    }

    async fn seed_team(state: &SharedState, room: &str, table: &str, scores: &[(u8, f64)]) {
        for (round, score) in scores {
            submit_score(
                state,
                ScoreSubmission {
                    room: room.into(),
                    table: table.into(),
                    team_name: format!("Team {table}"),
                    round: *round,
                    score: *score,
                },
            )
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn reset_to_round_drops_the_target_and_later_rounds() {
        let (state, store) = state_with_memory_store();
        seed_team(&state, "5", "1", &[(1, 10.0), (2, 20.0), (3, 30.0), (4, 5.0)]).await;

        let board = reset_to_round(&state, "5", "5-1", 2).await.unwrap();

        assert_eq!(board[0].scores, [(1, 10.0)].into());
        let signal = store.load_reset_signal("5-1").await.unwrap().unwrap();
        assert_eq!(signal.target_round, 2);
    }

    #[tokio::test]
    async fn reset_to_round_signals_even_without_a_board_entry() {
        let (state, store) = state_with_memory_store();

        let board = reset_to_round(&state, "5", "5-9", 3).await.unwrap();

        assert!(board.is_empty());
        let signal = store.load_reset_signal("5-9").await.unwrap().unwrap();
        assert_eq!(signal.target_round, 3);
    }

    #[tokio::test]
    async fn removing_an_unknown_team_leaves_the_board_unchanged() {
        let (state, _) = state_with_memory_store();
        seed_team(&state, "5", "1", &[(1, 10.0)]).await;

        let board = remove_team(&state, "5", "5-404").await.unwrap();

        assert_eq!(board.len(), 1);
        assert_eq!(board[0].team_key, "5-1");
    }

    #[tokio::test]
    async fn removing_a_team_persists_the_filtered_board() {
        let (state, _) = state_with_memory_store();
        seed_team(&state, "5", "1", &[(1, 10.0)]).await;
        seed_team(&state, "5", "2", &[(1, 20.0)]).await;

        let board = remove_team(&state, "5", "5-1").await.unwrap();
        assert_eq!(board.len(), 1);

        let reloaded = get_room(&state, "5").await.unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].team_key, "5-2");
    }

    #[tokio::test]
    async fn reset_team_empties_scores_but_keeps_the_entry() {
        let (state, _) = state_with_memory_store();
        seed_team(&state, "5", "1", &[(1, 10.0), (2, 20.0)]).await;

        let board = reset_team(&state, "5", "5-1").await.unwrap();

        assert_eq!(board.len(), 1);
        assert!(board[0].scores.is_empty());
        assert_eq!(board[0].team_name, "Team 1");
    }

    #[tokio::test]
    async fn clear_all_reports_the_number_of_rooms_deleted() {
        let (state, _) = state_with_memory_store();
        seed_team(&state, "5", "1", &[(1, 10.0)]).await;
        seed_team(&state, "12", "1", &[(1, 20.0)]).await;

        assert_eq!(clear_all(&state).await.unwrap(), 2);
        assert!(list_rooms(&state).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clearing_an_absent_room_succeeds() {
        let (state, _) = state_with_memory_store();
        clear_room(&state, "nowhere").await.unwrap();
    }

    #[test]
    fn authorization_requires_a_configured_matching_secret() {
        let store: Arc<dyn ScoreStore> = Arc::new(MemoryScoreStore::new());
        let mut config = AppConfig::default();
        config.admin_password = Some("hunter2".into());
        let state = AppState::new(config, store.clone(), None);

        assert!(authorize(&state, Some("hunter2")).is_ok());
        assert!(authorize(&state, Some("wrong")).is_err());
        assert!(authorize(&state, None).is_err());

        let unconfigured = AppState::new(AppConfig::default(), store, None);
        assert!(authorize(&unconfigured, Some("hunter2")).is_err());
    }
}

//! Business logic powering the public leaderboard routes.
//!
//! Boards are mutated with a whole-list read-modify-write and no concurrency
//! check: the store's atomicity covers single values only, so two concurrent
//! submissions to the same room can clobber each other's snapshot (last
//! writer wins). This is an accepted trade-off for event-day traffic, not
//! something to paper over here.

use std::cmp::Ordering;

use crate::{
    dao::models::{ResetSignal, TeamEntry, now_millis},
    error::ServiceError,
    state::SharedState,
};

/// Validated score submission.
#[derive(Debug, Clone)]
pub struct ScoreSubmission {
    /// Room the team plays in.
    pub room: String,
    /// Table identifier within the room.
    pub table: String,
    /// Display name for the team.
    pub team_name: String,
    /// Round the score belongs to.
    pub round: u8,
    /// Score achieved in that round.
    pub score: f64,
}

/// Return the room's board sorted for display. An absent board is an empty
/// list, not an error.
pub async fn read_board(state: &SharedState, room: &str) -> Result<Vec<TeamEntry>, ServiceError> {
    let mut entries = state.score_store().load_board(room).await?;
    sort_by_total(&mut entries);
    Ok(entries)
}

/// Apply a score submission to the room's board and return the sorted result.
pub async fn submit_score(
    state: &SharedState,
    submission: ScoreSubmission,
) -> Result<Vec<TeamEntry>, ServiceError> {
    let store = state.score_store();
    let mut entries = store.load_board(&submission.room).await?;

    upsert_entry(&mut entries, &submission, now_millis());
    store
        .save_board(&submission.room, entries.clone())
        .await?;

    sort_by_total(&mut entries);
    Ok(entries)
}

/// Pending reset signal for a team, if one was written and has not expired.
pub async fn pending_reset(
    state: &SharedState,
    team_key: &str,
) -> Result<Option<ResetSignal>, ServiceError> {
    Ok(state.score_store().load_reset_signal(team_key).await?)
}

/// Merge a submission into a board in place.
///
/// An existing entry gets `scores[round]` overwritten (a repeat of the same
/// submission is idempotent, a different score supersedes the earlier one)
/// and its display name refreshed; otherwise a new entry is appended.
pub fn upsert_entry(entries: &mut Vec<TeamEntry>, submission: &ScoreSubmission, now: i64) {
    let team_key = TeamEntry::key_for(&submission.room, &submission.table);

    if let Some(entry) = entries.iter_mut().find(|entry| entry.team_key == team_key) {
        entry.scores.insert(submission.round, submission.score);
        entry.team_name = submission.team_name.clone();
        entry.last_updated = now;
        return;
    }

    entries.push(TeamEntry {
        team_key,
        team_name: submission.team_name.clone(),
        room: submission.room.clone(),
        table: submission.table.clone(),
        scores: [(submission.round, submission.score)].into(),
        phases: Default::default(),
        last_updated: now,
    });
}

/// Sort a board by total score, highest first. The sort is stable, so teams
/// with equal totals keep their storage order.
pub fn sort_by_total(entries: &mut [TeamEntry]) {
    entries.sort_by(|a, b| {
        b.total_score()
            .partial_cmp(&a.total_score())
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        config::AppConfig,
        dao::score_store::{ScoreStore, memory::MemoryScoreStore},
        state::AppState,
    };

    use super::*;

    fn submission(room: &str, table: &str, round: u8, score: f64) -> ScoreSubmission {
        ScoreSubmission {
            room: room.into(),
            table: table.into(),
            team_name: format!("Team {table}"),
            round,
            score,
        }
    }

    fn entry_with_totals(key: &str, scores: &[(u8, f64)]) -> TeamEntry {
        TeamEntry {
            team_key: key.into(),
            team_name: key.into(),
            room: "1".into(),
            table: key.into(),
            scores: scores.iter().copied().collect(),
            phases: Default::default(),
            last_updated: 0,
        }
    }

    fn state_with_memory_store() -> (SharedState, MemoryScoreStore) {
        let store = MemoryScoreStore::new();
        let state = AppState::new(AppConfig::default(), Arc::new(store.clone()), None);
        (state, store)
    }

    #[test]
    fn repeated_submissions_do_not_grow_the_board() {
        let mut entries = Vec::new();
        upsert_entry(&mut entries, &submission("5", "1", 1, 10.0), 1);
        upsert_entry(&mut entries, &submission("5", "1", 1, 10.0), 2);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].scores.get(&1), Some(&10.0));
    }

    #[test]
    fn a_new_score_for_a_round_supersedes_the_old_one() {
        let mut entries = Vec::new();
        upsert_entry(&mut entries, &submission("5", "1", 2, 10.0), 1);
        upsert_entry(&mut entries, &submission("5", "1", 2, 25.0), 2);

        // overwritten, never summed
        assert_eq!(entries[0].scores.get(&2), Some(&25.0));
        assert_eq!(entries[0].total_score(), 25.0);
    }

    #[test]
    fn later_submissions_refresh_the_team_name() {
        let mut entries = Vec::new();
        upsert_entry(&mut entries, &submission("5", "1", 1, 10.0), 1);

        let mut renamed = submission("5", "1", 2, 5.0);
        renamed.team_name = "Renamed".into();
        upsert_entry(&mut entries, &renamed, 2);

        assert_eq!(entries[0].team_name, "Renamed");
        assert_eq!(entries[0].last_updated, 2);
        assert_eq!(entries[0].scores.len(), 2);
    }

    #[test]
    fn sorting_is_descending_and_stable_on_ties() {
        let mut entries = vec![
            entry_with_totals("a", &[(1, 30.0)]),
            entry_with_totals("b", &[(1, 50.0)]),
            entry_with_totals("c", &[(1, 20.0), (2, 30.0)]),
            entry_with_totals("d", &[(1, 10.0)]),
        ];

        sort_by_total(&mut entries);

        let keys: Vec<&str> = entries.iter().map(|e| e.team_key.as_str()).collect();
        let totals: Vec<f64> = entries.iter().map(TeamEntry::total_score).collect();
        assert_eq!(totals, vec![50.0, 50.0, 30.0, 10.0]);
        // b and c are tied; b was stored first and stays first
        assert_eq!(keys, vec!["b", "c", "a", "d"]);
    }

    #[tokio::test]
    async fn submit_then_read_shows_the_submitted_score() {
        let (state, _) = state_with_memory_store();

        submit_score(&state, submission("5", "3", 2, 42.0))
            .await
            .unwrap();
        let board = read_board(&state, "5").await.unwrap();

        assert_eq!(board.len(), 1);
        assert_eq!(board[0].team_key, "5-3");
        assert_eq!(board[0].scores.get(&2), Some(&42.0));
    }

    #[tokio::test]
    async fn reading_an_absent_room_yields_an_empty_board() {
        let (state, _) = state_with_memory_store();
        assert!(read_board(&state, "nowhere").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_submissions_to_one_room_can_clobber_each_other() {
        // Both writers snapshot the same (empty) board before either saves:
        // the second whole-list write drops the first writer's team. This
        // last-write-wins race is part of the contract.
        let (_, store) = state_with_memory_store();

        let snapshot_a = store.load_board("5").await.unwrap();
        let snapshot_b = store.load_board("5").await.unwrap();

        let mut board_a = snapshot_a;
        upsert_entry(&mut board_a, &submission("5", "1", 1, 10.0), 1);
        store.save_board("5", board_a).await.unwrap();

        let mut board_b = snapshot_b;
        upsert_entry(&mut board_b, &submission("5", "2", 1, 20.0), 1);
        store.save_board("5", board_b).await.unwrap();

        let board = store.load_board("5").await.unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].team_key, "5-2");
    }
}

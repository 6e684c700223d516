//! In-memory score store used by tests and feature-less local runs.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::dao::{
    models::{ResetSignal, TeamEntry, entries_from_value},
    score_store::{ScoreStore, board_key, reset_key, room_from_board_key},
    storage::{StorageError, StorageResult},
};

/// Score store backed by process memory. Values are kept as raw JSON so the
/// same defensive normalization path as the persistent backends is exercised.
#[derive(Clone, Default)]
pub struct MemoryScoreStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    boards: DashMap<String, Value>,
    signals: DashMap<String, (ResetSignal, Instant)>,
}

impl MemoryScoreStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an arbitrary raw value under a room's board key.
    ///
    /// The store has no schema enforcement; tests use this to reproduce
    /// boards written by other (or buggy) clients.
    pub fn put_raw_board(&self, room: &str, value: Value) {
        self.inner.boards.insert(board_key(room), value);
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load_board(&self, room: &str) -> BoxFuture<'static, StorageResult<Vec<TeamEntry>>> {
        let inner = self.inner.clone();
        let key = board_key(room);
        Box::pin(async move {
            let value = inner.boards.get(&key).map(|stored| stored.value().clone());
            Ok(value.map(entries_from_value).unwrap_or_default())
        })
    }

    fn save_board(
        &self,
        room: &str,
        entries: Vec<TeamEntry>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        let key = board_key(room);
        Box::pin(async move {
            let value = serde_json::to_value(&entries)
                .map_err(|source| StorageError::encoding(format!("board `{key}`"), source))?;
            inner.boards.insert(key, value);
            Ok(())
        })
    }

    fn delete_board(&self, room: &str) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        let key = board_key(room);
        Box::pin(async move { Ok(inner.boards.remove(&key).is_some()) })
    }

    fn list_rooms(&self) -> BoxFuture<'static, StorageResult<Vec<String>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            Ok(inner
                .boards
                .iter()
                .filter_map(|entry| room_from_board_key(entry.key()).map(str::to_owned))
                .collect())
        })
    }

    fn put_reset_signal(
        &self,
        team_key: &str,
        signal: ResetSignal,
        ttl: Duration,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        let key = reset_key(team_key);
        Box::pin(async move {
            inner.signals.insert(key, (signal, Instant::now() + ttl));
            Ok(())
        })
    }

    fn load_reset_signal(
        &self,
        team_key: &str,
    ) -> BoxFuture<'static, StorageResult<Option<ResetSignal>>> {
        let inner = self.inner.clone();
        let key = reset_key(team_key);
        Box::pin(async move {
            let Some(stored) = inner.signals.get(&key) else {
                return Ok(None);
            };
            let (signal, deadline) = stored.value().clone();
            drop(stored);

            if Instant::now() >= deadline {
                inner.signals.remove(&key);
                return Ok(None);
            }
            Ok(Some(signal))
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn boards_round_trip_and_list_rooms() {
        let store = MemoryScoreStore::new();
        let entry = TeamEntry {
            team_key: "5-1".into(),
            team_name: "Sharks".into(),
            room: "5".into(),
            table: "1".into(),
            scores: [(1, 10.0)].into(),
            phases: Default::default(),
            last_updated: 0,
        };

        store.save_board("5", vec![entry.clone()]).await.unwrap();
        assert_eq!(store.load_board("5").await.unwrap(), vec![entry]);
        assert_eq!(store.list_rooms().await.unwrap(), vec!["5".to_string()]);

        assert!(store.delete_board("5").await.unwrap());
        assert!(!store.delete_board("5").await.unwrap());
        assert!(store.load_board("5").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_raw_boards_load_as_empty() {
        let store = MemoryScoreStore::new();
        store.put_raw_board("7", json!({"definitely": "not a list"}));
        assert!(store.load_board("7").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn expired_reset_signals_are_absent() {
        let store = MemoryScoreStore::new();
        let signal = ResetSignal {
            target_round: 2,
            timestamp: 123,
        };

        store
            .put_reset_signal("5-1", signal.clone(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.load_reset_signal("5-1").await.unwrap(), Some(signal));

        store
            .put_reset_signal(
                "5-1",
                ResetSignal {
                    target_round: 3,
                    timestamp: 456,
                },
                Duration::ZERO,
            )
            .await
            .unwrap();
        assert_eq!(store.load_reset_signal("5-1").await.unwrap(), None);
    }
}

//! [`ScoreStore`] implementation on top of Redis.
//!
//! Boards are stored as JSON strings under `leaderboard:room:{room}` and
//! reset signals under `reset:{teamKey}` with a native TTL, so expiry needs
//! no cleanup job.

use std::time::Duration;

use futures::future::BoxFuture;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::warn;

use crate::dao::{
    models::{ResetSignal, TeamEntry, entries_from_value},
    score_store::{ScoreStore, board_key, reset_key, room_from_board_key},
    storage::{StorageError, StorageResult},
};

use super::config::RedisConfig;

/// Score store talking to a Redis instance through a reconnecting manager.
#[derive(Clone)]
pub struct RedisScoreStore {
    manager: ConnectionManager,
}

impl RedisScoreStore {
    /// Establish a connection to Redis and wrap it in a connection manager.
    pub async fn connect(config: RedisConfig) -> StorageResult<Self> {
        let client = Client::open(config.url.as_str())
            .map_err(|source| StorageError::unavailable("invalid Redis URL".into(), source))?;

        let manager = ConnectionManager::new(client).await.map_err(|source| {
            StorageError::unavailable(format!("connecting to `{}`", config.url), source)
        })?;

        Ok(Self { manager })
    }

    fn connection(&self) -> ConnectionManager {
        self.manager.clone()
    }
}

impl ScoreStore for RedisScoreStore {
    fn load_board(&self, room: &str) -> BoxFuture<'static, StorageResult<Vec<TeamEntry>>> {
        let mut conn = self.connection();
        let key = board_key(room);
        Box::pin(async move {
            let raw: Option<String> = conn
                .get(&key)
                .await
                .map_err(|source| StorageError::unavailable(format!("GET `{key}`"), source))?;

            let Some(raw) = raw else {
                return Ok(Vec::new());
            };

            match serde_json::from_str(&raw) {
                Ok(value) => Ok(entries_from_value(value)),
                Err(err) => {
                    warn!(%key, error = %err, "stored board is not valid JSON; treating it as empty");
                    Ok(Vec::new())
                }
            }
        })
    }

    fn save_board(
        &self,
        room: &str,
        entries: Vec<TeamEntry>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let mut conn = self.connection();
        let key = board_key(room);
        Box::pin(async move {
            let payload = serde_json::to_string(&entries)
                .map_err(|source| StorageError::encoding(format!("board `{key}`"), source))?;

            conn.set::<_, _, ()>(&key, payload)
                .await
                .map_err(|source| StorageError::unavailable(format!("SET `{key}`"), source))
        })
    }

    fn delete_board(&self, room: &str) -> BoxFuture<'static, StorageResult<bool>> {
        let mut conn = self.connection();
        let key = board_key(room);
        Box::pin(async move {
            let deleted: i64 = conn
                .del(&key)
                .await
                .map_err(|source| StorageError::unavailable(format!("DEL `{key}`"), source))?;
            Ok(deleted > 0)
        })
    }

    fn list_rooms(&self) -> BoxFuture<'static, StorageResult<Vec<String>>> {
        let mut conn = self.connection();
        Box::pin(async move {
            let pattern = board_key("*");
            let keys: Vec<String> = conn
                .keys(&pattern)
                .await
                .map_err(|source| StorageError::unavailable(format!("KEYS `{pattern}`"), source))?;

            Ok(keys
                .iter()
                .filter_map(|key| room_from_board_key(key).map(str::to_owned))
                .collect())
        })
    }

    fn put_reset_signal(
        &self,
        team_key: &str,
        signal: ResetSignal,
        ttl: Duration,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let mut conn = self.connection();
        let key = reset_key(team_key);
        Box::pin(async move {
            let payload = serde_json::to_string(&signal)
                .map_err(|source| StorageError::encoding(format!("signal `{key}`"), source))?;

            conn.set_ex::<_, _, ()>(&key, payload, ttl.as_secs())
                .await
                .map_err(|source| StorageError::unavailable(format!("SETEX `{key}`"), source))
        })
    }

    fn load_reset_signal(
        &self,
        team_key: &str,
    ) -> BoxFuture<'static, StorageResult<Option<ResetSignal>>> {
        let mut conn = self.connection();
        let key = reset_key(team_key);
        Box::pin(async move {
            let raw: Option<String> = conn
                .get(&key)
                .await
                .map_err(|source| StorageError::unavailable(format!("GET `{key}`"), source))?;

            let Some(raw) = raw else {
                return Ok(None);
            };

            match serde_json::from_str(&raw) {
                Ok(signal) => Ok(Some(signal)),
                Err(err) => {
                    warn!(%key, error = %err, "stored reset signal is malformed; ignoring it");
                    Ok(None)
                }
            }
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let mut conn = self.connection();
        Box::pin(async move {
            redis::cmd("PING")
                .query_async::<()>(&mut conn)
                .await
                .map_err(|source| StorageError::unavailable("PING".into(), source))
        })
    }
}

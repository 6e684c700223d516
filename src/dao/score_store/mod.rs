//! Abstraction over the key-value store holding room boards and reset signals.

pub mod memory;
#[cfg(feature = "redis-store")]
pub mod redis;

use std::time::Duration;

use futures::future::BoxFuture;

use crate::dao::models::{ResetSignal, TeamEntry};
use crate::dao::storage::StorageResult;

/// Prefix under which each room board is stored.
const BOARD_KEY_PREFIX: &str = "leaderboard:room:";
/// Prefix under which each reset signal is stored.
const RESET_KEY_PREFIX: &str = "reset:";

/// Store key holding the board for `room`.
pub fn board_key(room: &str) -> String {
    format!("{BOARD_KEY_PREFIX}{room}")
}

/// Store key holding the reset signal for `team_key`.
pub fn reset_key(team_key: &str) -> String {
    format!("{RESET_KEY_PREFIX}{team_key}")
}

/// Recover the room identifier from a board key, if it is one.
pub fn room_from_board_key(key: &str) -> Option<&str> {
    key.strip_prefix(BOARD_KEY_PREFIX)
}

/// Abstraction over the persistence layer for room boards and reset signals.
///
/// Boards are read and written as whole values; callers perform
/// read-modify-write with no concurrency check, so the last writer wins.
pub trait ScoreStore: Send + Sync {
    /// Load and normalize the board stored for `room`. Absent or malformed
    /// values yield an empty board.
    fn load_board(&self, room: &str) -> BoxFuture<'static, StorageResult<Vec<TeamEntry>>>;
    /// Replace the board stored for `room` with `entries`.
    fn save_board(
        &self,
        room: &str,
        entries: Vec<TeamEntry>,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Delete the board stored for `room`, reporting whether one existed.
    fn delete_board(&self, room: &str) -> BoxFuture<'static, StorageResult<bool>>;
    /// Enumerate the rooms that currently have a stored board.
    fn list_rooms(&self) -> BoxFuture<'static, StorageResult<Vec<String>>>;
    /// Write the reset signal for `team_key`, expiring after `ttl`.
    fn put_reset_signal(
        &self,
        team_key: &str,
        signal: ResetSignal,
        ttl: Duration,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Read the reset signal for `team_key`. Expired signals are absent.
    fn load_reset_signal(
        &self,
        team_key: &str,
    ) -> BoxFuture<'static, StorageResult<Option<ResetSignal>>>;
    /// Verify the backend is reachable.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}

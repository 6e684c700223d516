//! Entities persisted in the score store and helpers to read them defensively.
//!
//! The store carries no schema enforcement, so everything read back from it is
//! treated as untrusted JSON and normalized before the services touch it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::warn;
use utoipa::ToSchema;

/// One team's score record within a room board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamEntry {
    /// Unique identifier within the room, derived as `{room}-{table}`.
    pub team_key: String,
    /// Display name; the most recent submission wins.
    pub team_name: String,
    /// Room the team plays in. Immutable once created.
    pub room: String,
    /// Table identifier within the room. Immutable once created.
    pub table: String,
    /// Per-round scores keyed by round number. Keys are only removed by
    /// explicit reset operations.
    #[serde(default)]
    pub scores: BTreeMap<u8, f64>,
    /// Opaque per-round auxiliary state carried along for the client.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub phases: BTreeMap<u8, Value>,
    /// Unix-millisecond timestamp of the most recent mutation.
    #[serde(default)]
    pub last_updated: i64,
}

impl TeamEntry {
    /// Derive the team key for a room/table pair.
    pub fn key_for(room: &str, table: &str) -> String {
        format!("{room}-{table}")
    }

    /// Sum of every round score currently recorded.
    pub fn total_score(&self) -> f64 {
        self.scores.values().sum()
    }
}

/// Transient instruction telling a team's client to roll back to an earlier
/// round after an admin-initiated reset. Expires with the store entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetSignal {
    /// Round the client must resume from.
    pub target_round: u8,
    /// Unix-millisecond timestamp of the reset.
    pub timestamp: i64,
}

/// Normalize a raw stored value into a board.
///
/// Anything that is not a JSON array becomes an empty board; array items that
/// do not parse as [`TeamEntry`] are dropped with a warning.
pub fn entries_from_value(value: Value) -> Vec<TeamEntry> {
    let Value::Array(items) = value else {
        warn!("stored board is not a list; treating it as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<TeamEntry>(item) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping malformed board entry");
                None
            }
        })
        .collect()
}

/// Current wall-clock time in unix milliseconds.
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

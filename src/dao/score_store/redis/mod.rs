//! Redis-backed score store.

mod config;
mod store;

pub use config::RedisConfig;
pub use store::RedisScoreStore;

//! Runtime configuration for the Redis score store.

use std::env;

/// Default connection URL when `REDIS_URL` is not set.
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Runtime configuration describing how to connect to Redis.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Connection URL, including credentials when required.
    pub url: String,
}

impl RedisConfig {
    /// Construct a configuration from an explicit connection URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Build a configuration from the `REDIS_URL` environment variable,
    /// falling back to a local instance.
    pub fn from_env() -> Self {
        let url = env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.into());
        Self::new(url)
    }
}

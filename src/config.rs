//! Application-level configuration loaded from the environment at startup.

use std::{env, time::Duration};

/// Default lifetime of a reset signal before the store expires it.
const DEFAULT_RESET_SIGNAL_TTL: Duration = Duration::from_secs(14_400);
/// Environment variable overriding [`DEFAULT_RESET_SIGNAL_TTL`] (seconds).
const RESET_SIGNAL_TTL_ENV: &str = "RESET_SIGNAL_TTL_SECS";
/// Environment variable holding the pre-shared admin secret.
const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Pre-shared secret gating the admin endpoint. When absent every admin
    /// request is rejected.
    pub admin_password: Option<String>,
    /// Lifetime of reset signals written by `reset-to-round`.
    pub reset_signal_ttl: Duration,
}

impl AppConfig {
    /// Read the configuration from environment variables.
    pub fn from_env() -> Self {
        let admin_password = env::var(ADMIN_PASSWORD_ENV)
            .ok()
            .filter(|value| !value.is_empty());

        let reset_signal_ttl = env::var(RESET_SIGNAL_TTL_ENV)
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_RESET_SIGNAL_TTL);

        Self {
            admin_password,
            reset_signal_ttl,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            admin_password: None,
            reset_signal_ttl: DEFAULT_RESET_SIGNAL_TTL,
        }
    }
}

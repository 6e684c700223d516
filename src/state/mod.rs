//! Shared application state injected into every route handler.

use std::{sync::Arc, time::Duration};

use crate::{config::AppConfig, dao::score_store::ScoreStore, llm::LlmClient};

/// Cheaply cloneable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state holding the injected store and grader handles.
///
/// Both collaborators are constructed once at startup and passed in here;
/// nothing in the crate reaches for process-wide singletons.
pub struct AppState {
    config: AppConfig,
    score_store: Arc<dyn ScoreStore>,
    grader: Option<Arc<LlmClient>>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned
    /// cheaply across handlers.
    pub fn new(
        config: AppConfig,
        score_store: Arc<dyn ScoreStore>,
        grader: Option<Arc<LlmClient>>,
    ) -> SharedState {
        Arc::new(Self {
            config,
            score_store,
            grader,
        })
    }

    /// Handle to the score store backend.
    pub fn score_store(&self) -> Arc<dyn ScoreStore> {
        self.score_store.clone()
    }

    /// Handle to the LLM grader, when one is configured.
    pub fn grader(&self) -> Option<Arc<LlmClient>> {
        self.grader.clone()
    }

    /// Pre-shared admin secret, when one is configured.
    pub fn admin_password(&self) -> Option<&str> {
        self.config.admin_password.as_deref()
    }

    /// Lifetime of reset signals written by `reset-to-round`.
    pub fn reset_signal_ttl(&self) -> Duration {
        self.config.reset_signal_ttl
    }
}

//! Runtime configuration for the LLM grading client.

use std::env;

/// Default chat-completions endpoint when `LLM_API_URL` is not set.
const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// Default model when `LLM_MODEL` is not set.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Runtime configuration describing how to reach the grading model.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Chat-completions endpoint URL.
    pub api_url: String,
    /// Bearer token authenticating against the provider.
    pub api_key: String,
    /// Model identifier sent with each request.
    pub model: String,
}

impl LlmConfig {
    /// Build a configuration from the environment. Returns `None` when no
    /// API key is configured, in which case grading uses the fallback
    /// heuristic only.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("LLM_API_KEY").ok().filter(|key| !key.is_empty())?;
        let api_url = env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let model = env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        Some(Self {
            api_url,
            api_key,
            model,
        })
    }
}

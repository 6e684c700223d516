//! HTTP client grading submissions through a chat-completions API.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{config::LlmConfig, error::LlmError};

/// How long a single grading call may take before it counts as timed out.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Instruction steering the model towards a bare numeric grade.
const GRADING_PROMPT: &str = "You are judging one team's answer in a live sales-simulation \
     exercise. Grade how convincing and complete the answer is on a scale from 0 to 100. \
     Reply with a single integer and nothing else.";

/// Client for the external grading model.
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

/// Successful grading outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedAnswer {
    /// Score in `[0, 100]` extracted from the completion.
    pub score: f64,
    /// Model that produced the grade.
    pub model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatCompletionMessage,
}

#[derive(Deserialize)]
struct ChatCompletionMessage {
    content: String,
}

impl LlmClient {
    /// Build a client for the configured provider.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| LlmError::ClientBuilder { source })?;

        Ok(Self { client, config })
    }

    /// Model identifier this client grades with.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Submit an answer for grading and extract the numeric score.
    pub async fn grade(
        &self,
        answer: &str,
        context: Option<&str>,
    ) -> Result<GradedAnswer, LlmError> {
        let user_content = match context {
            Some(context) => format!("Context: {context}\n\nAnswer: {answer}"),
            None => format!("Answer: {answer}"),
        };

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: GRADING_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            temperature: 0.0,
            max_tokens: 16,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| LlmError::RequestSend { source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status, body });
        }

        let payload = response
            .json::<ChatResponse>()
            .await
            .map_err(|source| LlmError::Decode { source })?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(LlmError::EmptyCompletion)?;

        let score = extract_score(&content).ok_or(LlmError::UnparsableScore { content })?;

        Ok(GradedAnswer {
            score,
            model: self.config.model.clone(),
        })
    }
}

/// Pull the first integer out of a completion and clamp it to `[0, 100]`.
fn extract_score(content: &str) -> Option<f64> {
    let digits: String = content
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse::<f64>().ok().map(|score| score.clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_are_extracted_from_completions() {
        assert_eq!(extract_score("87"), Some(87.0));
        assert_eq!(extract_score("Score: 42/100"), Some(42.0));
        assert_eq!(extract_score("  73\n"), Some(73.0));
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        assert_eq!(extract_score("250"), Some(100.0));
    }

    #[test]
    fn completions_without_a_number_yield_none() {
        assert_eq!(extract_score("no score here"), None);
        assert_eq!(extract_score(""), None);
    }
}

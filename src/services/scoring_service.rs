//! Grading of free-text submissions, with a deterministic fallback.

use tracing::warn;

use crate::{
    dto::scoring::{ScoreResponse, ScoreSource},
    llm::{DEFAULT_MAX_ATTEMPTS, LlmError, call_with_retry},
    state::SharedState,
};

/// Keywords a strong sales answer tends to touch on.
const KEYWORDS: [&str; 8] = [
    "customer", "value", "price", "benefit", "solution", "need", "budget", "close",
];

/// Grade a submission through the external model when one is configured,
/// retrying transient provider failures. Any remaining failure falls back to
/// the deterministic heuristic so the event never stalls on the provider.
pub async fn score_submission(
    state: &SharedState,
    answer: &str,
    context: Option<&str>,
) -> ScoreResponse {
    if let Some(grader) = state.grader() {
        let result = call_with_retry(
            || {
                let grader = grader.clone();
                let answer = answer.to_owned();
                let context = context.map(str::to_owned);
                async move { grader.grade(&answer, context.as_deref()).await }
            },
            DEFAULT_MAX_ATTEMPTS,
            LlmError::transient_kind,
        )
        .await;

        match result {
            Ok(graded) => {
                return ScoreResponse {
                    score: graded.score,
                    source: ScoreSource::Ai,
                    model: Some(graded.model),
                };
            }
            Err(err) => {
                warn!(error = %err, "LLM grading failed; using the heuristic score");
            }
        }
    }

    ScoreResponse {
        score: heuristic_score(answer),
        source: ScoreSource::Fallback,
        model: None,
    }
}

/// Deterministic stand-in grade when the model is unavailable: rewards
/// substance (length, capped) and coverage of sales vocabulary.
pub fn heuristic_score(answer: &str) -> f64 {
    let words = answer.split_whitespace().count();
    if words == 0 {
        return 0.0;
    }

    let length_points = (words as f64 * 1.5).min(40.0);
    let lower = answer.to_lowercase();
    let keyword_points = KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(*keyword))
        .count() as f64
        * 5.0;

    (30.0 + length_points + keyword_points).min(100.0)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{config::AppConfig, dao::score_store::memory::MemoryScoreStore, state::AppState};

    use super::*;

    #[test]
    fn empty_answers_score_zero() {
        assert_eq!(heuristic_score(""), 0.0);
        assert_eq!(heuristic_score("   "), 0.0);
    }

    #[test]
    fn the_heuristic_is_deterministic() {
        let answer = "We lead with customer value and close on budget.";
        assert_eq!(heuristic_score(answer), heuristic_score(answer));
    }

    #[test]
    fn substance_and_vocabulary_raise_the_score() {
        let thin = heuristic_score("ok");
        let rich = heuristic_score(
            "We open by mapping the customer's need, quantify the value of the solution \
             against their budget, then handle the price objection and close.",
        );
        assert!(rich > thin);
        assert!(rich <= 100.0);
    }

    #[tokio::test]
    async fn without_a_grader_the_fallback_is_used() {
        let state = AppState::new(
            AppConfig::default(),
            Arc::new(MemoryScoreStore::new()),
            None,
        );

        let response = score_submission(&state, "a decent pitch about value", None).await;

        assert_eq!(response.source, ScoreSource::Fallback);
        assert!(response.model.is_none());
        assert!(response.score > 0.0);
    }
}

use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with the health payload, pinging the store for connectivity.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.score_store().health_check().await {
        Ok(()) => HealthResponse::ok(),
        Err(err) => {
            warn!(error = %err, "store health check failed");
            HealthResponse::degraded()
        }
    }
}

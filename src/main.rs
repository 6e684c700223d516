//! Pitchboard Back binary entrypoint wiring the REST layer to the score store.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dao;
mod dto;
mod error;
mod llm;
mod routes;
mod services;
mod state;

use config::AppConfig;
use dao::score_store::ScoreStore;
use llm::{LlmClient, LlmConfig};
use state::{AppState, SharedState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env();
    if config.admin_password.is_none() {
        warn!("ADMIN_PASSWORD is not set; admin endpoints will reject every request");
    }

    let store = connect_store().await?;
    let grader = match LlmConfig::from_env() {
        Some(llm_config) => {
            info!(model = %llm_config.model, "LLM grader configured");
            Some(Arc::new(LlmClient::new(llm_config)?))
        }
        None => {
            info!("no LLM credentials configured; scoring falls back to the heuristic");
            None
        }
    };

    let app_state = AppState::new(config, store, grader);
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Connect the configured score store backend.
#[cfg(feature = "redis-store")]
async fn connect_store() -> anyhow::Result<Arc<dyn ScoreStore>> {
    use dao::score_store::redis::{RedisConfig, RedisScoreStore};

    let config = RedisConfig::from_env();
    let store = RedisScoreStore::connect(config.clone())
        .await
        .with_context(|| format!("connecting to Redis at {}", config.url))?;
    info!(url = %config.url, "connected to Redis score store");
    Ok(Arc::new(store))
}

/// Fall back to the in-memory score store when no backend feature is enabled.
#[cfg(not(feature = "redis-store"))]
async fn connect_store() -> anyhow::Result<Arc<dyn ScoreStore>> {
    use dao::score_store::memory::MemoryScoreStore;

    warn!("no persistent store backend compiled in; scores are kept in memory only");
    Ok(Arc::new(MemoryScoreStore::new()))
}

/// Build the top-level router and attach cross-cutting middleware layers.
///
/// The permissive CORS layer keeps every endpoint open to the event consoles
/// and answers OPTIONS pre-flight requests.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

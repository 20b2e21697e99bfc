mod config;
mod errors;
mod generation;
mod history;
mod llm_client;
mod models;
mod quiz;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::history::store::{KvStore, MemoryKvStore, RedisKvStore};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkinFirst API v{}", env!("CARGO_PKG_VERSION"));

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set; every session will use fallback results");
    }
    let llm = LlmClient::new(config.gemini_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let store: Arc<dyn KvStore> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            let store = RedisKvStore::connect(&client).await?;
            info!("Redis store connected");
            Arc::new(store)
        }
        None => {
            warn!("REDIS_URL not set; history and the active routine are kept in memory");
            Arc::new(MemoryKvStore::new())
        }
    };

    let state = AppState::new(Arc::new(llm), store, config.generation_timeout);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

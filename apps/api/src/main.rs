mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod profile;
mod render;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::GeminiClient;
use crate::profile::store::PgProfileStore;
use crate::render::load_templates;
use crate::routes::build_router;
use crate::session::RedisSessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Melodex v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (profile documents)
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis (sessions)
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize Gemini client
    let llm = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_endpoint.clone())?;
    info!("LLM client initialized (endpoint: {})", llm.endpoint());

    let templates = load_templates()?;
    info!("Page templates loaded");

    let state = AppState {
        profiles: Arc::new(PgProfileStore::new(db)),
        sessions: Arc::new(RedisSessionStore::new(redis, config.session_ttl_secs)),
        llm: Arc::new(llm),
        templates: Arc::new(templates),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

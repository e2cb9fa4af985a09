mod auth;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;
mod tailoring;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::JwtVerifier;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::ChatClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgCvStore;
use crate::tailoring::pipeline::TailoringPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cvtailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config).await?;

    // Wire collaborators explicitly — no module-level singletons
    let store = Arc::new(PgCvStore::new(db));
    let llm = Arc::new(ChatClient::new(
        config.ai_base_url.clone(),
        config.ai_api_key.clone(),
        config.ai_model.clone(),
    ));
    info!("Generation client initialized (model: {})", config.ai_model);

    let verifier = Arc::new(JwtVerifier::new(&config.jwt_secret));

    // Build app state
    let state = AppState {
        pipeline: Arc::new(TailoringPipeline::new(store, llm)),
        auth: verifier,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

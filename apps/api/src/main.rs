mod analysis;
mod config;
mod db;
mod errors;
mod extraction;
mod models;
mod recommendation;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::scorer::KeywordCompatibilityScorer;
use crate::config::{load_policy, load_vocabulary, Config};
use crate::db::create_pool;
use crate::routes::build_router;
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

    info!("Starting Matchmaker API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Matching data and constants
    let vocabulary = Arc::new(load_vocabulary(config.skill_vocabulary_path.as_deref())?);
    let policy = load_policy(config.matching_policy_path.as_deref())?;

    let scorer = Arc::new(KeywordCompatibilityScorer::new(
        Arc::clone(&vocabulary),
        policy.scoring,
    ));
    info!(
        "Ranking: timeout {}ms, parallel from {} postings, max {} postings",
        config.ranking_timeout_ms,
        config.parallel_ranking_threshold,
        config.max_postings_per_ranking
    );

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        vocabulary,
        scorer,
        ranking_policy: Arc::new(policy.ranking),
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

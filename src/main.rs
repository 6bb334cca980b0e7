use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use safeko::admin::AdminGate;
use safeko::config::{Cli, Config};
use safeko::db::blob_store::SqliteBlobStore;
use safeko::planner::GeminiPlanner;
use safeko::state::AppState;
use safeko::{db, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Initialize database
    let pool = db::create_pool(&config.db_path())?;
    db::run_migrations(&pool)?;
    let blobs = SqliteBlobStore::new(pool, config.storage.capacity_bytes);

    // Itinerary generation
    let planner = GeminiPlanner::new(
        Url::parse(&config.planner.endpoint)?,
        &config.planner.model,
        config.planner.api_key.clone(),
        config.planner.timeout(),
    )?;
    if config.planner.api_key.is_none() {
        tracing::warn!("No planner API key configured; itinerary generation will fail");
    }

    let admin_gate = AdminGate::new(&config.admin.password)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState::new(config, Arc::new(blobs), Arc::new(planner), admin_gate);
    let app = routes::app(state);

    // Start server
    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

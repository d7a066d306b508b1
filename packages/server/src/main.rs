use std::sync::Arc;

use anyhow::Context;
use common::storage::FilesystemBlobStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use plagcheck_server::analysis::QuickChartRenderer;
use plagcheck_server::config::AppConfig;
use plagcheck_server::database::init_db;
use plagcheck_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database)
        .await
        .context("Failed to connect to database")?;

    let blob_store = FilesystemBlobStore::new(config.storage.root.clone(), config.storage.max_file_size)
        .await
        .with_context(|| format!("Failed to open storage at {}", config.storage.root.display()))?;
    info!(root = %config.storage.root.display(), "Blob storage ready");

    let word_cloud =
        QuickChartRenderer::new(&config.analysis).context("Failed to build word cloud client")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        config: Arc::new(config),
        db,
        blob_store: Arc::new(blob_store),
        word_cloud: Arc::new(word_cloud),
    };

    let app = plagcheck_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

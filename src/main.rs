// Page text extraction server
//
// Serves headless-browser page extraction over HTTP, deduplicated against a
// bounded URL history stored in SQLite.

use anyhow::{Context, Result};
use kodegen_tools_pagetext::{
    ChromeEngine, ChromeEngineConfig, Extractor, HistoryStore, HttpServer, PageTextService,
    ServiceConfig, SiteRegistry,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,chromiumoxide::handler=off,chromiumoxide::conn=off")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Log panics through tracing; the panicking request fails, the server lives on
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Unhandled panic: {panic_info}");
    }));
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    install_panic_hook();

    info!("Starting page text server");

    let config = ServiceConfig::from_env().context("Invalid configuration")?;
    config.validate().context("Invalid configuration")?;

    let history = HistoryStore::open(config.history_db_path(), config.history_capacity())
        .await
        .context("Failed to open URL history")?;

    // Chrome is launched lazily on the first extraction
    let engine = Arc::new(ChromeEngine::new(ChromeEngineConfig {
        headless: config.headless(),
        executable: config.chromium_path().map(std::path::Path::to_path_buf),
    }));

    let service = Arc::new(PageTextService::new(
        history.clone(),
        Extractor::new(Arc::clone(&engine)),
        SiteRegistry::with_defaults(),
        config.clone(),
    ));

    let server = HttpServer::bind(&config.listen_addr(), service).await?;
    server.run(shutdown_signal()).await?;

    if let Err(e) = engine.shutdown().await {
        error!("Browser shutdown failed: {e:#}");
    }
    history.close().await;

    info!("Page text server stopped");
    Ok(())
}

//! Ledgerbook API Server
//!
//! Main entry point for the Ledgerbook backend service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledgerbook_api::{AppState, create_router};
use ledgerbook_core::fx::HttpRateSource;
use ledgerbook_db::connect;
use ledgerbook_shared::AppConfig;
use ledgerbook_shared::types::Currency;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledgerbook=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("loading configuration")?;

    let base_currency: Currency = config
        .books
        .base_currency
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("parsing books.base_currency")?;

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Build the FX rate source
    let rate_source = HttpRateSource::new(
        &config.books.fx_source_url,
        Duration::from_secs(config.books.fx_timeout_secs),
    )
    .context("building fx rate source")?;
    info!(
        url = %config.books.fx_source_url,
        base_currency = %base_currency,
        "FX rate source configured"
    );

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        base_currency,
        rate_source: Arc::new(rate_source),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

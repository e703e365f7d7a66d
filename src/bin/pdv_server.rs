// src/bin/pdv_server.rs
//! Document retrieval server

use anyhow::{Context, Result};
use patient_document_vault::http::{build_router, AppState};
use patient_document_vault::Config;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load().context("Failed to load configuration")?;
    let addr = config.bind_addr()?;
    let state = AppState::from_config(&config)
        .context("Failed to initialise document store (is PDV_DOCUMENT_KEY set?)")?;

    if state.access_token.is_none() {
        info!("no access token configured, document routes are open");
    }

    let app = build_router(state);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("serving documents on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

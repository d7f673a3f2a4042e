//! vsd - control daemon for Visionary Solutions AV encoders/decoders
//!
//! Serves the control API and funnels every device command through a single
//! dispatcher so devices never see concurrent sessions.
//!
//! Usage:
//!   vsd [OPTIONS]
//!
//! Credentials come from `--username`/`--password`, `VS_USERNAME`/`VS_PASSWORD`
//! or the `[device]` section of the config file.

mod config;
mod logging;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use vs_api::log_level::parse_level;
use vs_api::{create_router, AppState};
use vs_client::{Dispatcher, HttpTransport};

use crate::config::{Cli, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let initial_level =
        parse_level(&cli.log).with_context(|| format!("Invalid log level: {}", cli.log))?;
    let log_level = logging::init(initial_level);

    tracing::info!("Initializing device control");

    let settings = Settings::resolve(&cli)?;
    if settings.credentials.username.is_empty() {
        tracing::warn!("No device username configured, devices may reject requests");
    }

    let transport = HttpTransport::new(settings.credentials.clone())
        .context("Failed to create HTTP transport")?;
    let (dispatcher, worker) = Dispatcher::spawn(Arc::new(transport), settings.dispatcher.clone());

    let state = AppState::new(dispatcher, log_level).with_device_port(settings.device_port);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    worker.abort();
    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

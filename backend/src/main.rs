use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use omicscloud_backend::logging::init_logging;
use omicscloud_backend::{AppState, ServerConfig, create_router, shutdown_signal};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::parse();
    init_logging(config.log_format)?;

    let bind_addr: SocketAddr = config
        .bind
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.bind))?;

    let service = config.storage.build_service().await?;
    let app = create_router(AppState::new(service));

    let listener = TcpListener::bind(bind_addr)
        .await
        .context("failed to bind TCP listener")?;

    info!(%bind_addr, event = "startup.listening", "server starting");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server shutdown")?;

    Ok(())
}

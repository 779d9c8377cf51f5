//! kalem binary: load configuration, pick a store backend, serve the API.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use kalem::api::{self, AppState};
use kalem::config::Config;
use kalem::store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("configuration error")?;
    let store = store::create_store(&config).context("store initialization failed")?;

    tracing::info!(
        environment = %config.environment,
        backend = %store.name(),
        addr = %config.bind_addr,
        "starting kalem"
    );

    let app = api::router(AppState::new(store, &config));
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    // Exit cleanly on ctrl-c; in-flight commit chains run to completion or
    // fail, they are never cancelled midway by the shutdown itself.
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install ctrl-c handler");
    }
}

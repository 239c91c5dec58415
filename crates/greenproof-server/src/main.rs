use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greenproof::store::{MemoryStore, SqliteStore, Store};
use greenproof::GreenProof;
use greenproof_server::{build_router, ServerConfig, StorageConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "greenproof=info,greenproof_server=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ServerConfig::from_env()?;
    tracing::info!(?cfg, "starting greenproof server");

    let store: Arc<dyn Store> = match &cfg.storage {
        StorageConfig::Sqlite(path) => Arc::new(
            SqliteStore::open(path)
                .with_context(|| format!("opening database {}", path.display()))?,
        ),
        StorageConfig::Memory => {
            tracing::warn!("using in-memory store; records are lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let service = Arc::new(GreenProof::new(store, cfg.service.clone()));
    let app = build_router(service, cfg.request_timeout);

    let listener = TcpListener::bind(cfg.bind_addr)
        .await
        .with_context(|| format!("binding {}", cfg.bind_addr))?;
    tracing::info!("Listening on {}", cfg.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

//! escala server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `ESCALA_*`
//! environment variables, opens the configured record store and serves the
//! JSON API over HTTP until interrupted.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use escala_core::store::RecordStore;
use escala_server::{ServerConfig, StoreBackend};
use escala_store_json::JsonFileStore;
use escala_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Escala scheduling API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = escala_server::load_config(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  match server_cfg.backend {
    StoreBackend::Json => {
      let store = JsonFileStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open json store at {store_path:?}"))?;
      serve(store, &server_cfg).await
    }
    StoreBackend::Sqlite => {
      let store = SqliteStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open sqlite store at {store_path:?}"))?;
      serve(store, &server_cfg).await
    }
  }
}

/// Serve until Ctrl-C, then close the store.
async fn serve<S>(store: S, server_cfg: &ServerConfig) -> anyhow::Result<()>
where
  S: RecordStore + 'static,
{
  let store = Arc::new(store);
  let app = escala_server::app(store.clone(), server_cfg);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!(backend = ?server_cfg.backend, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("shutting down");
  store.close().await.context("failed to close store")?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("failed to listen for shutdown signal: {e}");
    std::future::pending::<()>().await;
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

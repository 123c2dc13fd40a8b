//! HTTP server assembly for Escala.
//!
//! Wraps the [`escala_api`] router with the cross-cutting layers (CORS,
//! request tracing, panic recovery) and owns the runtime configuration.

use std::{
  any::Any,
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Json, Router,
  http::{Method, StatusCode, header},
  response::{IntoResponse, Response},
};
use escala_core::store::RecordStore;
use serde::Deserialize;
use serde_json::json;
use tower_http::{
  catch_panic::CatchPanicLayer,
  cors::{AllowOrigin, Any as AnyOrigin, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which [`RecordStore`] implementation backs the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
  /// One JSON document on disk.
  #[default]
  Json,
  /// A SQLite database file.
  Sqlite,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `ESCALA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:         String,
  #[serde(default = "default_port")]
  pub port:         u16,
  #[serde(default)]
  pub backend:      StoreBackend,
  #[serde(default = "default_store_path")]
  pub store_path:   PathBuf,
  /// Allowed CORS origins. Empty allows any origin.
  #[serde(default)]
  pub cors_origins: Vec<String>,
}

fn default_host() -> String { "0.0.0.0".to_owned() }

fn default_port() -> u16 { 3000 }

fn default_store_path() -> PathBuf { PathBuf::from("/tmp/database.json") }

/// Read `path` (if it exists) layered under `ESCALA_*` environment variables.
///
/// `ESCALA_CORS_ORIGINS` takes a comma-separated list.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(
      config::Environment::with_prefix("ESCALA")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors_origins"),
    )
    .build()?
    .try_deserialize()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application: API routes plus server layers.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: RecordStore + 'static,
{
  with_layers(escala_api::api_router(store), &config.cors_origins)
}

fn with_layers(router: Router, cors_origins: &[String]) -> Router {
  router
    .layer(cors_layer(cors_origins))
    .layer(TraceLayer::new_for_http())
    .layer(CatchPanicLayer::custom(panic_response))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
  let layer = CorsLayer::new()
    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
    .allow_headers([header::CONTENT_TYPE]);

  if origins.is_empty() {
    return layer.allow_origin(AnyOrigin);
  }
  let parsed: Vec<_> = origins
    .iter()
    .filter_map(|origin| match origin.parse() {
      Ok(value) => Some(value),
      Err(e) => {
        tracing::warn!("ignoring invalid CORS origin '{origin}': {e}");
        None
      }
    })
    .collect();
  layer.allow_origin(AllowOrigin::list(parsed))
}

/// Last-resort boundary: a panicking handler becomes a generic JSON 500.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
  let detail = err
    .downcast_ref::<String>()
    .map(String::as_str)
    .or_else(|| err.downcast_ref::<&str>().copied())
    .unwrap_or("non-string panic payload");
  tracing::error!(panic = detail, "handler panicked");
  (
    StatusCode::INTERNAL_SERVER_ERROR,
    Json(json!({ "error": "internal server error" })),
  )
    .into_response()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The engine refused the request.
  #[error(transparent)]
  Rejected(#[from] escala_core::Error),

  /// The request could not be parsed.
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("route not found")]
  RouteNotFound,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    Self::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Rejected(e) if e.is_not_found() => {
        (StatusCode::NOT_FOUND, e.to_string())
      }
      ApiError::Rejected(e) => {
        tracing::debug!(error = %e, "request rejected");
        (StatusCode::BAD_REQUEST, e.to_string())
      }
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::RouteNotFound => (StatusCode::NOT_FOUND, self.to_string()),
      // The cause stays in the log; callers get a generic message.
      ApiError::Store(e) => {
        tracing::error!(error = %e, "record store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "internal server error".to_owned(),
        )
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

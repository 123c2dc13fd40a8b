//! Handlers for `/trocas` endpoints.
//!
//! | Method | Path          | Notes |
//! |--------|---------------|-------|
//! | `GET`  | `/trocas`     | Each exchange carries its class and both teachers |
//! | `GET`  | `/trocas/:id` | Same shape as a list entry |
//! | `POST` | `/trocas`     | Body: [`ExchangeBody`]; created as `PENDING` |
//! | `PUT`  | `/trocas/:id` | Body: `{"status":"APPROVED"\|"REJECTED"}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use escala_core::{
  Error,
  dataset::Collection,
  exchange::{ExchangeStatus, NewExchange},
  store::RecordStore,
  view::ExchangeView,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  error::ApiError,
  extract::{ApiJson, ApiPath},
};

#[derive(Debug, Deserialize)]
pub struct ExchangeBody {
  #[serde(rename = "aulaId")]
  pub class_id:              Option<u64>,
  #[serde(rename = "professorOriginalId")]
  pub original_teacher_id:   Option<u64>,
  #[serde(rename = "professorSubstitutoId")]
  pub substitute_teacher_id: Option<u64>,
  #[serde(rename = "motivo")]
  pub reason:                Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: Option<String>,
}

/// `GET /trocas`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<ExchangeView>>, ApiError>
where
  S: RecordStore,
{
  let data = store.load().await.map_err(ApiError::store)?;
  Ok(Json(data.exchange_views()))
}

/// `GET /trocas/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<u64>,
) -> Result<Json<ExchangeView>, ApiError>
where
  S: RecordStore,
{
  let data = store.load().await.map_err(ApiError::store)?;
  let exchange = data
    .exchange(id)
    .ok_or_else(|| Error::not_found(Collection::Exchange, id))?;
  Ok(Json(data.exchange_view(exchange)))
}

/// `POST /trocas` — returns 201 + `{"message", "troca"}`.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<ExchangeBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let mut data = store.load().await.map_err(ApiError::store)?;
  let exchange = data.create_exchange(
    NewExchange {
      class_id:              body.class_id,
      original_teacher_id:   body.original_teacher_id,
      substitute_teacher_id: body.substitute_teacher_id,
      reason:                body.reason,
    },
    Utc::now(),
  )?;
  store.save(&data).await.map_err(ApiError::store)?;
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "exchange requested", "troca": exchange })),
  ))
}

/// `PUT /trocas/:id` — approve or reject a pending exchange.
///
/// Approval also reassigns the class; both changes go out in one save.
pub async fn set_status<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<u64>,
  ApiJson(body): ApiJson<StatusBody>,
) -> Result<Json<Value>, ApiError>
where
  S: RecordStore,
{
  let mut data = store.load().await.map_err(ApiError::store)?;
  let exchange = data.set_exchange_status(id, body.status, Utc::now())?;
  store.save(&data).await.map_err(ApiError::store)?;

  let message = match exchange.status {
    ExchangeStatus::Approved => "exchange approved",
    _ => "exchange rejected",
  };
  Ok(Json(json!({ "message": message, "troca": exchange })))
}

//! Handlers for `/materias` endpoints.
//!
//! | Method   | Path             | Notes |
//! |----------|------------------|-------|
//! | `GET`    | `/materias`      | All subjects, insertion order |
//! | `GET`    | `/materias/:id`  | 404 if not found |
//! | `POST`   | `/materias`      | Body: `{"nome":"..."}`; returns 201 |
//! | `PUT`    | `/materias/:id`  | Body: `{"nome":"..."}` (optional) |
//! | `DELETE` | `/materias/:id`  | 400 while a teacher lists the subject |

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
  store::RecordStore,
  subject::{NewSubject, Subject, SubjectPatch},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  error::ApiError,
  extract::{ApiJson, ApiPath},
};

/// JSON body accepted by `POST /materias` and `PUT /materias/:id`.
#[derive(Debug, Deserialize)]
pub struct SubjectBody {
  #[serde(rename = "nome")]
  pub name: Option<String>,
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /materias`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Subject>>, ApiError>
where
  S: RecordStore,
{
  let data = store.load().await.map_err(ApiError::store)?;
  Ok(Json(data.subjects))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /materias/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<u64>,
) -> Result<Json<Subject>, ApiError>
where
  S: RecordStore,
{
  let data = store.load().await.map_err(ApiError::store)?;
  let subject = data
    .subject(id)
    .cloned()
    .ok_or_else(|| Error::not_found(Collection::Subject, id))?;
  Ok(Json(subject))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /materias` — returns 201 + the stored subject.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<SubjectBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let mut data = store.load().await.map_err(ApiError::store)?;
  let subject =
    data.create_subject(NewSubject { name: body.name }, Utc::now())?;
  store.save(&data).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(subject)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /materias/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<u64>,
  ApiJson(body): ApiJson<SubjectBody>,
) -> Result<Json<Subject>, ApiError>
where
  S: RecordStore,
{
  let mut data = store.load().await.map_err(ApiError::store)?;
  let subject =
    data.update_subject(id, SubjectPatch { name: body.name }, Utc::now())?;
  store.save(&data).await.map_err(ApiError::store)?;
  Ok(Json(subject))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /materias/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<u64>,
) -> Result<Json<Value>, ApiError>
where
  S: RecordStore,
{
  let mut data = store.load().await.map_err(ApiError::store)?;
  data.delete_subject(id)?;
  store.save(&data).await.map_err(ApiError::store)?;
  Ok(Json(json!({ "message": format!("subject {id} removed") })))
}

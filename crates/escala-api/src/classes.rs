//! Handlers for `/aulas` endpoints.
//!
//! | Method   | Path         | Notes |
//! |----------|--------------|-------|
//! | `GET`    | `/aulas`     | Each class carries `professor: {id, nome}` |
//! | `GET`    | `/aulas/:id` | Same shape as a list entry |
//! | `POST`   | `/aulas`     | Body: [`ClassBody`], all fields required |
//! | `PUT`    | `/aulas/:id` | Body: [`ClassBody`], any subset |
//! | `DELETE` | `/aulas/:id` | 400 once the class has started |

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
  class::{ClassPatch, NewClass},
  dataset::Collection,
  store::RecordStore,
  view::ClassView,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  error::ApiError,
  extract::{ApiJson, ApiPath},
};

#[derive(Debug, Deserialize)]
pub struct ClassBody {
  #[serde(rename = "data")]
  pub date:       Option<String>,
  #[serde(rename = "horario")]
  pub time:       Option<String>,
  #[serde(rename = "professorId")]
  pub teacher_id: Option<u64>,
  #[serde(rename = "turma")]
  pub section:    Option<String>,
}

/// `GET /aulas`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<ClassView>>, ApiError>
where
  S: RecordStore,
{
  let data = store.load().await.map_err(ApiError::store)?;
  Ok(Json(data.class_views()))
}

/// `GET /aulas/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<u64>,
) -> Result<Json<ClassView>, ApiError>
where
  S: RecordStore,
{
  let data = store.load().await.map_err(ApiError::store)?;
  let class = data
    .class(id)
    .ok_or_else(|| Error::not_found(Collection::Class, id))?;
  Ok(Json(data.class_view(class)))
}

/// `POST /aulas` — returns 201 + `{"message", "aula"}`.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<ClassBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let mut data = store.load().await.map_err(ApiError::store)?;
  let class = data.create_class(
    NewClass {
      date:       body.date,
      time:       body.time,
      teacher_id: body.teacher_id,
      section:    body.section,
    },
    Utc::now(),
  )?;
  store.save(&data).await.map_err(ApiError::store)?;
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "class scheduled", "aula": class })),
  ))
}

/// `PUT /aulas/:id` — re-runs every scheduling check on the merged record.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<u64>,
  ApiJson(body): ApiJson<ClassBody>,
) -> Result<Json<Value>, ApiError>
where
  S: RecordStore,
{
  let mut data = store.load().await.map_err(ApiError::store)?;
  let class = data.update_class(
    id,
    ClassPatch {
      date:       body.date,
      time:       body.time,
      teacher_id: body.teacher_id,
      section:    body.section,
    },
    Utc::now(),
  )?;
  store.save(&data).await.map_err(ApiError::store)?;
  Ok(Json(json!({ "message": "class updated", "aula": class })))
}

/// `DELETE /aulas/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<u64>,
) -> Result<Json<Value>, ApiError>
where
  S: RecordStore,
{
  let mut data = store.load().await.map_err(ApiError::store)?;
  data.delete_class(id, Utc::now())?;
  store.save(&data).await.map_err(ApiError::store)?;
  Ok(Json(json!({ "message": format!("class {id} removed") })))
}

//! Handlers for `/professores` endpoints.
//!
//! Reads return [`TeacherView`]s, with subject ids expanded into subjects.
//! Writes return the stored record, whose `materias` field holds ids.

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
  teacher::{NewTeacher, Teacher, TeacherPatch},
  view::TeacherView,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  error::ApiError,
  extract::{ApiJson, ApiPath},
};

/// JSON body accepted by `POST /professores` and `PUT /professores/:id`.
#[derive(Debug, Deserialize)]
pub struct TeacherBody {
  #[serde(rename = "nome")]
  pub name:        Option<String>,
  #[serde(rename = "materiaIds")]
  pub subject_ids: Option<Vec<u64>>,
}

/// `GET /professores`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<TeacherView>>, ApiError>
where
  S: RecordStore,
{
  let data = store.load().await.map_err(ApiError::store)?;
  Ok(Json(data.teacher_views()))
}

/// `GET /professores/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<u64>,
) -> Result<Json<TeacherView>, ApiError>
where
  S: RecordStore,
{
  let data = store.load().await.map_err(ApiError::store)?;
  let teacher = data
    .teacher(id)
    .ok_or_else(|| Error::not_found(Collection::Teacher, id))?;
  Ok(Json(data.teacher_view(teacher)))
}

/// `POST /professores` — body: `{"nome":"...","materiaIds":[1,2]}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<TeacherBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let mut data = store.load().await.map_err(ApiError::store)?;
  let teacher = data.create_teacher(
    NewTeacher { name: body.name, subject_ids: body.subject_ids },
    Utc::now(),
  )?;
  store.save(&data).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(teacher)))
}

/// `PUT /professores/:id` — `materiaIds`, when present, replaces the list.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<u64>,
  ApiJson(body): ApiJson<TeacherBody>,
) -> Result<Json<Teacher>, ApiError>
where
  S: RecordStore,
{
  let mut data = store.load().await.map_err(ApiError::store)?;
  let teacher = data.update_teacher(
    id,
    TeacherPatch { name: body.name, subject_ids: body.subject_ids },
    Utc::now(),
  )?;
  store.save(&data).await.map_err(ApiError::store)?;
  Ok(Json(teacher))
}

/// `DELETE /professores/:id` — 400 while any class is assigned.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<u64>,
) -> Result<Json<Value>, ApiError>
where
  S: RecordStore,
{
  let mut data = store.load().await.map_err(ApiError::store)?;
  data.delete_teacher(id)?;
  store.save(&data).await.map_err(ApiError::store)?;
  Ok(Json(json!({ "message": format!("teacher {id} removed") })))
}

//! JSON REST API for Escala.
//!
//! Exposes an axum [`Router`] backed by any [`escala_core::store::RecordStore`].
//! Every handler loads the full dataset, runs one engine operation and, for
//! writes, saves the dataset back. CORS, tracing and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! axum::serve(listener, escala_api::api_router(Arc::new(store))).await?;
//! ```

pub mod classes;
pub mod error;
pub mod exchanges;
pub mod extract;
pub mod subjects;
pub mod teachers;

use std::sync::Arc;

use axum::{Router, routing::get};
use escala_core::store::RecordStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// Requests that match no route, or use a method the route does not serve,
/// get `404 {"error":"route not found"}`.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    // Subjects
    .route("/materias", get(subjects::list::<S>).post(subjects::create::<S>))
    .route(
      "/materias/{id}",
      get(subjects::get_one::<S>)
        .put(subjects::update::<S>)
        .delete(subjects::delete_one::<S>),
    )
    // Teachers
    .route("/professores", get(teachers::list::<S>).post(teachers::create::<S>))
    .route(
      "/professores/{id}",
      get(teachers::get_one::<S>)
        .put(teachers::update::<S>)
        .delete(teachers::delete_one::<S>),
    )
    // Classes
    .route("/aulas", get(classes::list::<S>).post(classes::create::<S>))
    .route(
      "/aulas/{id}",
      get(classes::get_one::<S>)
        .put(classes::update::<S>)
        .delete(classes::delete_one::<S>),
    )
    // Exchanges
    .route("/trocas", get(exchanges::list::<S>).post(exchanges::create::<S>))
    .route(
      "/trocas/{id}",
      get(exchanges::get_one::<S>).put(exchanges::set_status::<S>),
    )
    .fallback(route_not_found)
    .method_not_allowed_fallback(route_not_found)
    .with_state(store)
}

async fn route_not_found() -> ApiError { ApiError::RouteNotFound }

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use escala_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.expect("in-memory store");
    api_router(Arc::new(store))
  }

  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
  ) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if body.is_some() {
      req = req.header(header::CONTENT_TYPE, "application/json");
    }
    let req = req
      .body(Body::from(body.unwrap_or_default().to_owned()))
      .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    body: Value,
  ) -> (StatusCode, Value) {
    send(app, method, uri, Some(&body.to_string())).await
  }

  const CLASS: &str =
    r#"{"data":"2030-01-01","horario":"10:00","professorId":1,"turma":"A"}"#;

  /// Math, Alice (Math), Bob, and class 1 taught by Alice.
  async fn seeded() -> Router {
    let app = app().await;
    call(&app, "POST", "/materias", json!({ "nome": "Math" })).await;
    call(&app, "POST", "/professores", json!({ "nome": "Alice", "materiaIds": [1] }))
      .await;
    call(&app, "POST", "/professores", json!({ "nome": "Bob" })).await;
    let (status, _) = send(&app, "POST", "/aulas", Some(CLASS)).await;
    assert_eq!(status, StatusCode::CREATED);
    app
  }

  // ── Subjects ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_subject_returns_201_with_record() {
    let app = app().await;
    let (status, body) =
      call(&app, "POST", "/materias", json!({ "nome": "Math" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["nome"], "Math");
    assert!(body["createdAt"].is_string());
    assert!(body.get("updatedAt").is_none());
  }

  #[tokio::test]
  async fn create_subject_without_name_is_400() {
    let app = app().await;
    let (status, body) = call(&app, "POST", "/materias", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "nome is required");
  }

  #[tokio::test]
  async fn get_update_and_missing_subject() {
    let app = app().await;
    call(&app, "POST", "/materias", json!({ "nome": "Math" })).await;

    let (status, body) =
      call(&app, "PUT", "/materias/1", json!({ "nome": "Algebra" })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["updatedAt"].is_string());

    let (status, body) = send(&app, "GET", "/materias/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nome"], "Algebra");

    let (status, body) = send(&app, "GET", "/materias/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) =
      call(&app, "PUT", "/materias/9", json!({ "nome": "x" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_taught_subject_is_400_and_keeps_it() {
    let app = seeded().await;
    let (status, body) = send(&app, "DELETE", "/materias/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, list) = send(&app, "GET", "/materias", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn delete_free_subject_returns_message() {
    let app = app().await;
    call(&app, "POST", "/materias", json!({ "nome": "Art" })).await;
    let (status, body) = send(&app, "DELETE", "/materias/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, _) = send(&app, "DELETE", "/materias/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Teachers ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_teacher_stores_subject_ids() {
    let app = app().await;
    call(&app, "POST", "/materias", json!({ "nome": "Math" })).await;
    let (status, body) = call(
      &app,
      "POST",
      "/professores",
      json!({ "nome": "Alice", "materiaIds": [1] }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["materias"], json!([1]));
  }

  #[tokio::test]
  async fn create_teacher_with_unknown_subject_is_400() {
    let app = app().await;
    let (status, _) = call(
      &app,
      "POST",
      "/professores",
      json!({ "nome": "Alice", "materiaIds": [3] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn teacher_reads_are_enriched() {
    let app = seeded().await;
    let (status, list) = send(&app, "GET", "/professores", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["materias"][0]["nome"], "Math");
    assert_eq!(list[1]["materias"], json!([]));

    let (status, one) = send(&app, "GET", "/professores/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["materias"][0]["id"], 1);
  }

  #[tokio::test]
  async fn update_teacher_validates_subjects() {
    let app = seeded().await;
    let (status, _) =
      call(&app, "PUT", "/professores/2", json!({ "materiaIds": [5] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
      call(&app, "PUT", "/professores/2", json!({ "materiaIds": [1] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["materias"], json!([1]));
  }

  #[tokio::test]
  async fn delete_teacher_with_class_is_400() {
    let app = seeded().await;
    let (status, _) = send(&app, "DELETE", "/professores/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "DELETE", "/professores/2", None).await;
    assert_eq!(status, StatusCode::OK);
  }

  // ── Classes ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_class_then_repeat_conflicts() {
    let app = app().await;
    call(&app, "POST", "/professores", json!({ "nome": "Alice" })).await;

    let (status, body) = send(&app, "POST", "/aulas", Some(CLASS)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["aula"]["id"], 1);
    assert!(body["message"].is_string());

    let (status, body) = send(&app, "POST", "/aulas", Some(CLASS)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn create_class_for_unknown_teacher_is_400() {
    let app = app().await;
    let (status, _) = send(&app, "POST", "/aulas", Some(CLASS)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, list) = send(&app, "GET", "/aulas", None).await;
    assert_eq!(list, json!([]));
  }

  #[tokio::test]
  async fn class_list_attaches_teacher() {
    let app = seeded().await;
    let (status, list) = send(&app, "GET", "/aulas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["professor"], json!({ "id": 1, "nome": "Alice" }));
    assert_eq!(list[0]["horario"], "10:00");

    let (status, _) = send(&app, "GET", "/aulas/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn update_class_moves_it() {
    let app = seeded().await;
    let (status, body) =
      call(&app, "PUT", "/aulas/1", json!({ "horario": "14:00" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["aula"]["horario"], "14:00");
    assert_eq!(body["aula"]["turma"], "A");
  }

  #[tokio::test]
  async fn delete_past_class_is_400_future_is_200() {
    let app = seeded().await;
    let (status, _) = call(
      &app,
      "POST",
      "/aulas",
      json!({ "data": "2020-01-01", "horario": "08:00", "professorId": 2, "turma": "B" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "DELETE", "/aulas/2", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "DELETE", "/aulas/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
  }

  // ── Exchanges ────────────────────────────────────────────────────────────────

  fn exchange(original: u64, substitute: u64) -> Value {
    json!({
      "aulaId": 1,
      "professorOriginalId": original,
      "professorSubstitutoId": substitute,
      "motivo": "conference",
    })
  }

  #[tokio::test]
  async fn create_exchange_is_pending() {
    let app = seeded().await;
    let (status, body) = call(&app, "POST", "/trocas", exchange(1, 2)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["troca"]["id"], 1);
    assert_eq!(body["troca"]["status"], "PENDING");
  }

  #[tokio::test]
  async fn exchange_with_wrong_original_is_400() {
    let app = seeded().await;
    let (status, _) = call(&app, "POST", "/trocas", exchange(2, 1)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn approving_reassigns_the_class() {
    let app = seeded().await;
    call(&app, "POST", "/trocas", exchange(1, 2)).await;

    let (status, body) =
      call(&app, "PUT", "/trocas/1", json!({ "status": "APPROVED" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["troca"]["status"], "APPROVED");
    assert_eq!(body["message"], "exchange approved");

    let (_, class) = send(&app, "GET", "/aulas/1", None).await;
    assert_eq!(class["professorId"], 2);

    let (_, list) = send(&app, "GET", "/trocas", None).await;
    assert_eq!(list[0]["professorSubstituto"]["nome"], "Bob");
    assert_eq!(list[0]["aula"]["id"], 1);
  }

  #[tokio::test]
  async fn rejecting_keeps_the_class() {
    let app = seeded().await;
    call(&app, "POST", "/trocas", exchange(1, 2)).await;

    let (status, body) =
      call(&app, "PUT", "/trocas/1", json!({ "status": "REJECTED" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["troca"]["status"], "REJECTED");

    let (_, class) = send(&app, "GET", "/aulas/1", None).await;
    assert_eq!(class["professorId"], 1);
  }

  #[tokio::test]
  async fn invalid_status_is_400_and_unknown_exchange_404() {
    let app = seeded().await;
    call(&app, "POST", "/trocas", exchange(1, 2)).await;

    let (status, _) =
      call(&app, "PUT", "/trocas/1", json!({ "status": "PENDING" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) =
      call(&app, "PUT", "/trocas/7", json!({ "status": "APPROVED" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Plumbing ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unmatched_route_is_404_json() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "route not found" }));
  }

  #[tokio::test]
  async fn unsupported_method_is_404_json() {
    let app = seeded().await;
    for (method, uri) in
      [("DELETE", "/trocas/1"), ("PATCH", "/materias/1"), ("PUT", "/aulas")]
    {
      let (status, body) = send(&app, method, uri, None).await;
      assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
      assert_eq!(body, json!({ "error": "route not found" }));
    }
  }

  #[tokio::test]
  async fn malformed_input_is_400_json() {
    let app = app().await;
    let (status, body) = send(&app, "POST", "/materias", Some("{ nope")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "GET", "/materias/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn store_failure_is_generic_500() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store.close().await.unwrap();
    let app = api_router(Arc::new(store));

    let (status, body) = send(&app, "GET", "/materias", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "internal server error" }));
  }
}

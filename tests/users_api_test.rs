use axum::{
  body::Body,
  http::{Request, StatusCode},
  Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use user_service::{app::create_app, state::SharedAppState};

fn app() -> Router {
  create_app(SharedAppState::in_memory(4))
}

async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let request = match body {
    Some(body) => builder
      .header("content-type", "application/json")
      .body(Body::from(serde_json::to_vec(&body).unwrap()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let response = app.oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = response.into_body().collect().await.unwrap().to_bytes();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };

  (status, value)
}

#[tokio::test]
async fn test_user_lifecycle() {
  let app = app();

  let (status, created) = call(
    app.clone(),
    "POST",
    "/v1/users",
    Some(json!({
      "first_name": "Ada",
      "last_name": "Lovelace",
      "nickname": "ada",
      "email": "ada@example.com",
      "password": "analytical",
      "country": "UK"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = created["id"].as_str().unwrap().to_string();
  assert!(!id.is_empty());
  assert_eq!(created["email"], "ada@example.com");
  assert!(created.get("password").is_none());

  let uri = format!("/v1/users/{}", id);
  let (status, fetched) = call(app.clone(), "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["nickname"], "ada");
  assert_eq!(fetched["created_at"], created["created_at"]);

  let (status, updated) = call(
    app.clone(),
    "PUT",
    &uri,
    Some(json!({ "nickname": "countess", "country": "UK" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["nickname"], "countess");
  assert_eq!(updated["email"], "ada@example.com");
  assert_eq!(updated["created_at"], created["created_at"]);

  let (status, list) = call(app.clone(), "GET", "/v1/users?search=ada", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(list["total"], 1);
  assert_eq!(list["users"][0]["nickname"], "countess");

  let (status, body) = call(app.clone(), "DELETE", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, Value::Null);

  let (status, error) = call(app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(error["code"], "user_not_found");
  assert_eq!(error["status_code"], 404);
}

#[tokio::test]
async fn test_create_user_without_email() {
  let (status, error) = call(app(), "POST", "/v1/users", Some(json!({ "nickname": "anon" }))).await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(error["code"], "missing_email");
}

#[tokio::test]
async fn test_list_empty() {
  let (status, list) = call(app(), "GET", "/v1/users", None).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(list["total"], 0);
  assert_eq!(list["users"], json!([]));
  assert_eq!(list["prev_page"], Value::Null);
  assert_eq!(list["next_page"], Value::Null);
}

#[tokio::test]
async fn test_list_far_page_reports_previous_page() {
  let app = app();
  for i in 0..2 {
    let (status, _) = call(
      app.clone(),
      "POST",
      "/v1/users",
      Some(json!({ "email": format!("far{}@example.com", i) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
  }

  let (status, list) = call(app, "GET", "/v1/users?page=5&per_page=10", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(list["total"], 2);
  assert_eq!(list["users"], json!([]));
  assert_eq!(list["prev_page"], 4);
  assert_eq!(list["next_page"], Value::Null);
  assert!(list["prev_cursor"].is_string());
}

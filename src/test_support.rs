use axum::{
  body::{Body, Bytes},
  http::{Method, Request, StatusCode},
  Router,
};
use serde::Serialize;
use tower::ServiceExt;

use crate::{app::create_app, state::SharedAppState};

/// Lowest cost bcrypt accepts, keeps request tests fast.
pub const TEST_PASSWORD_COST: u32 = 4;

pub fn app_in_memory() -> Router {
  create_app(SharedAppState::in_memory(TEST_PASSWORD_COST))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Bytes) {
  let response = app.oneshot(request).await.expect("handle request");
  let status = response.status();
  let body = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("read response body");
  (status, body)
}

async fn send_json<T: Serialize>(app: Router, method: Method, uri: &str, body: &T) -> (StatusCode, Bytes) {
  let request = Request::builder()
    .method(method)
    .uri(uri)
    .header("content-type", "application/json")
    .body(Body::from(serde_json::to_vec(body).expect("serialize request body")))
    .expect("build request");

  send(app, request).await
}

pub async fn post_json<T: Serialize>(app: Router, uri: &str, body: &T) -> (StatusCode, Bytes) {
  send_json(app, Method::POST, uri, body).await
}

pub async fn put_json<T: Serialize>(app: Router, uri: &str, body: &T) -> (StatusCode, Bytes) {
  send_json(app, Method::PUT, uri, body).await
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Bytes) {
  let request = Request::builder()
    .method(Method::GET)
    .uri(uri)
    .body(Body::empty())
    .expect("build request");

  send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> (StatusCode, Bytes) {
  let request = Request::builder()
    .method(Method::DELETE)
    .uri(uri)
    .body(Body::empty())
    .expect("build request");

  send(app, request).await
}

use axum::{
  extract::rejection::{JsonRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;

use crate::error::{Error, ErrorKind};

#[derive(Debug)]
pub struct AppError {
  pub status_code: StatusCode,
  pub code: String,
  pub message: String,
}

impl AppError {
  pub fn new(status_code: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      status_code,
      code: code.into(),
      message: message.into(),
    }
  }

  pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
    Self::new(StatusCode::BAD_REQUEST, code, message)
  }

  pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
    Self::new(StatusCode::NOT_FOUND, code, message)
  }

  pub fn conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
    Self::new(StatusCode::CONFLICT, code, message)
  }

  pub fn internal_server_error(code: impl Into<String>) -> Self {
    Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, "Internal server error occurred")
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let body = Json(json!({
      "error": self.message,
      "code": self.code,
      "status_code": self.status_code.as_u16(),
    }));

    (self.status_code, body).into_response()
  }
}

impl From<AppError> for StatusCode {
  fn from(err: AppError) -> Self {
    err.status_code
  }
}

impl From<Error> for AppError {
  fn from(error: Error) -> Self {
    match error.kind() {
      ErrorKind::NotFound => AppError::not_found(error.code(), error.message()),
      ErrorKind::AlreadyExists => AppError::conflict(error.code(), error.message()),
      ErrorKind::InvalidArgument => AppError::bad_request(error.code(), error.message()),
      ErrorKind::Internal | ErrorKind::Unknown => {
        tracing::error!(error = ?error, "request failed");
        AppError::internal_server_error(error.code())
      }
    }
  }
}

impl From<JsonRejection> for AppError {
  fn from(rejection: JsonRejection) -> Self {
    tracing::warn!("unable to decode request body: {}", rejection.body_text());
    AppError::bad_request("invalid_json", rejection.body_text())
  }
}

impl From<QueryRejection> for AppError {
  fn from(rejection: QueryRejection) -> Self {
    tracing::warn!("unable to decode query string: {}", rejection.body_text());
    AppError::bad_request("invalid_query", rejection.body_text())
  }
}

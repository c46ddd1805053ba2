//! Tagged error taxonomy shared by every layer of the service.
//!
//! An [`Error`] carries a closed [`ErrorKind`], a machine readable `code` and a
//! human readable message. Two errors are equal when their kind and code
//! match; the message and the wrapped cause are ignored, so callers can
//! compare against a sentinel built with an empty message.

use std::fmt;

use serde::Serialize;

pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  NotFound,
  InvalidArgument,
  AlreadyExists,
  Internal,
  Unknown,
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ErrorKind::NotFound => "NotFound",
      ErrorKind::InvalidArgument => "InvalidArgument",
      ErrorKind::AlreadyExists => "AlreadyExists",
      ErrorKind::Internal => "Internal",
      ErrorKind::Unknown => "Unknown",
    };
    f.write_str(name)
  }
}

#[derive(Debug, thiserror::Error)]
#[error("type = {kind} code = {code} desc = {message}")]
pub struct Error {
  kind: ErrorKind,
  code: String,
  message: String,
  #[source]
  source: Option<BoxError>,
}

impl Error {
  pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      kind,
      code: code.into(),
      message: message.into(),
      source: None,
    }
  }

  pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
    Self::new(ErrorKind::NotFound, code, message)
  }

  pub fn invalid_argument(code: impl Into<String>, message: impl Into<String>) -> Self {
    Self::new(ErrorKind::InvalidArgument, code, message)
  }

  pub fn already_exists(code: impl Into<String>, message: impl Into<String>) -> Self {
    Self::new(ErrorKind::AlreadyExists, code, message)
  }

  pub fn internal(code: impl Into<String>, message: impl Into<String>) -> Self {
    Self::new(ErrorKind::Internal, code, message)
  }

  /// Attaches the underlying cause, exposed through `std::error::Error::source`.
  pub fn with_source<E>(mut self, source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    self.source = Some(Box::new(source));
    self
  }

  pub fn kind(&self) -> ErrorKind {
    self.kind
  }

  pub fn code(&self) -> &str {
    &self.code
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn is_kind(&self, kind: ErrorKind) -> bool {
    self.kind == kind
  }
}

impl PartialEq for Error {
  fn eq(&self, other: &Self) -> bool {
    self.kind == other.kind && self.code == other.code
  }
}

impl Eq for Error {}

impl From<sqlx::Error> for Error {
  fn from(err: sqlx::Error) -> Self {
    match err {
      sqlx::Error::RowNotFound => Error::not_found("row_not_found", "no rows returned"),
      other => Error::internal("database_error", format!("Database error: {}", other)).with_source(other),
    }
  }
}

//! Opaque pagination cursors.
//!
//! A [`Cursor`] is serialized to JSON and encoded as URL-safe base64 without
//! padding, so the token can travel in a query string untouched. Advancing a
//! cursor never mutates it: [`Cursor::next_token`] and [`Cursor::prev_token`]
//! hand back a fresh token for the neighbouring page.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const INVALID_CURSOR: &str = "invalid_cursor";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
  /// Field the pagination is anchored on.
  pub primary_key: String,
  pub per_page: u64,
  /// Offset-style page index.
  pub page: u64,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub search_before: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub search_after: String,
  /// Loaded once and carried along so later pages can skip the count.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub total: Option<u64>,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub search: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub country: String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub embed: Vec<String>,
}

impl Cursor {
  pub fn new(primary_key: impl Into<String>, per_page: u64, page: u64) -> Self {
    Self {
      primary_key: primary_key.into(),
      per_page,
      page,
      ..Default::default()
    }
  }

  pub fn encode(&self) -> String {
    // Serializing a struct of strings and integers cannot fail.
    let bytes = serde_json::to_vec(self).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(bytes)
  }

  pub fn decode(token: &str) -> Result<Self, Error> {
    let bytes = URL_SAFE_NO_PAD
      .decode(token)
      .map_err(|e| Error::invalid_argument(INVALID_CURSOR, "cursor is not valid base64").with_source(e))?;

    serde_json::from_slice(&bytes)
      .map_err(|e| Error::invalid_argument(INVALID_CURSOR, "cursor payload is malformed").with_source(e))
  }

  pub fn next_token(&self) -> String {
    let mut next = self.clone();
    next.page = next.page.saturating_add(1);
    next.encode()
  }

  pub fn prev_token(&self) -> String {
    let mut prev = self.clone();
    prev.page = prev.page.saturating_sub(1);
    prev.encode()
  }
}

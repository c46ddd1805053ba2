use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::{error::Error, pagination::Cursor};

pub const DEFAULT_PER_PAGE: u64 = 25;

pub const USER_NOT_FOUND: &str = "user_not_found";
pub const USER_ALREADY_EXISTS: &str = "user_already_exists";

pub fn user_not_found(id: &str) -> Error {
  Error::not_found(USER_NOT_FOUND, format!("user {} not found", id))
}

pub fn user_already_exists(email: &str) -> Error {
  Error::already_exists(USER_ALREADY_EXISTS, format!("user with email '{}' already exists", email))
}

/// A stored user. `password` only ever holds request plaintext and is never
/// persisted or serialized; `encoded_password` never leaves the service.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Deserialize, Serialize)]
#[serde(default)]
pub struct User {
  pub id: String,
  pub first_name: String,
  pub last_name: String,
  pub nickname: String,
  pub email: String,
  #[serde(skip_serializing)]
  #[sqlx(skip)]
  pub password: String,
  #[serde(skip)]
  pub encoded_password: String,
  pub country: String,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /v1/users` and `PUT /v1/users/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct UserRequest {
  #[validate(length(max = 64, message = "id must be at most 64 characters"))]
  pub id: String,
  #[validate(length(max = 255, message = "first_name must be at most 255 characters"))]
  pub first_name: String,
  #[validate(length(max = 255, message = "last_name must be at most 255 characters"))]
  pub last_name: String,
  #[validate(length(max = 255, message = "nickname must be at most 255 characters"))]
  pub nickname: String,
  #[validate(length(max = 255, message = "email must be at most 255 characters"))]
  pub email: String,
  pub password: String,
  #[validate(length(max = 64, message = "country must be at most 64 characters"))]
  pub country: String,
}

impl From<UserRequest> for User {
  fn from(req: UserRequest) -> Self {
    Self {
      id: req.id,
      first_name: req.first_name,
      last_name: req.last_name,
      nickname: req.nickname,
      email: req.email,
      password: req.password,
      country: req.country,
      ..Default::default()
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListOptions {
  /// Zero based.
  pub page: u64,
  /// 0 means [`DEFAULT_PER_PAGE`].
  pub per_page: u64,
  pub country: String,
  /// Case sensitive substring match against email.
  pub search: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cursor: Option<String>,
}

impl ListOptions {
  pub fn new() -> Self {
    Self {
      per_page: DEFAULT_PER_PAGE,
      ..Default::default()
    }
  }

  pub fn search_email(email: impl Into<String>) -> Self {
    Self {
      search: email.into(),
      ..Default::default()
    }
  }

  pub fn effective_per_page(&self) -> u64 {
    if self.per_page == 0 {
      DEFAULT_PER_PAGE
    } else {
      self.per_page
    }
  }

  pub fn offset(&self) -> u64 {
    self.page.saturating_mul(self.effective_per_page())
  }

  /// Replaces paging and filters with the state carried by an opaque cursor.
  pub fn apply_cursor(&mut self) -> Result<(), Error> {
    let Some(token) = self.cursor.as_deref().filter(|t| !t.is_empty()) else {
      return Ok(());
    };

    let cursor = Cursor::decode(token)?;
    self.page = cursor.page;
    self.per_page = cursor.per_page;
    self.search = cursor.search;
    self.country = cursor.country;
    Ok(())
  }

  pub fn matches(&self, user: &User) -> bool {
    (self.country.is_empty() || user.country == self.country)
      && (self.search.is_empty() || user.email.contains(&self.search))
  }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UserList {
  pub users: Vec<User>,
  pub total: u64,
  pub prev_page: Option<u64>,
  pub next_page: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prev_cursor: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub next_cursor: Option<String>,
}

impl UserList {
  /// Builds a page from rows fetched with one look-ahead row past `per_page`.
  ///
  /// A previous page is reported whenever `page > 0`, even when that page
  /// would be empty.
  pub fn from_lookahead(mut users: Vec<User>, total: u64, page: u64, per_page: u64) -> Self {
    let limit = usize::try_from(per_page).unwrap_or(usize::MAX);

    let next_page = if users.len() > limit {
      users.truncate(limit);
      Some(page.saturating_add(1))
    } else {
      None
    };

    let prev_page = page.checked_sub(1);

    Self {
      users,
      total,
      prev_page,
      next_page,
      prev_cursor: None,
      next_cursor: None,
    }
  }

  pub fn attach_cursors(&mut self, opts: &ListOptions) {
    let mut cursor = Cursor::new("email", opts.effective_per_page(), opts.page);
    cursor.search = opts.search.clone();
    cursor.country = opts.country.clone();
    cursor.total = Some(self.total);

    self.prev_cursor = self.prev_page.map(|_| cursor.prev_token());
    self.next_cursor = self.next_page.map(|_| cursor.next_token());
  }
}

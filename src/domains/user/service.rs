use async_trait::async_trait;

use super::{
  event::{EventService, USER_CREATED, USER_DELETED, USER_UPDATED},
  model::{user_already_exists, ListOptions, User, UserList},
  repository::UserRepository,
};
use crate::{error::Error, utils::password::hash_password};

pub const DEFAULT_PASSWORD_COST: u32 = 14;

pub const MISSING_EMAIL: &str = "missing_email";
pub const EVENT_DELIVERY_FAILED: &str = "event_delivery_failed";

#[async_trait]
pub trait UserService: Send + Sync {
  async fn list(&self, opts: &ListOptions) -> Result<UserList, Error>;
  async fn get(&self, id: &str) -> Result<User, Error>;
  /// Creates a user; fails with `AlreadyExists` when the email is taken.
  async fn save(&self, user: User) -> Result<User, Error>;
  /// Updates the mutable fields of an existing user; `NotFound` otherwise.
  async fn update(&self, id: &str, user: User) -> Result<User, Error>;
  async fn delete(&self, id: &str) -> Result<(), Error>;
}

pub struct UserServiceImpl<R, E> {
  repository: R,
  events: E,
  password_cost: u32,
}

impl<R, E> UserServiceImpl<R, E>
where
  R: UserRepository,
  E: EventService,
{
  pub fn new(repository: R, events: E, password_cost: u32) -> Self {
    Self {
      repository,
      events,
      password_cost,
    }
  }

  /// Replaces the plaintext password with its bcrypt hash.
  async fn encode_password(&self, user: &mut User) -> Result<(), Error> {
    if user.password.is_empty() {
      return Ok(());
    }

    let password = std::mem::take(&mut user.password);
    let cost = self.password_cost;

    user.encoded_password = tokio::task::spawn_blocking(move || hash_password(&password, cost))
      .await
      .map_err(|e| Error::internal("password_hashing_aborted", "password hashing task failed").with_source(e))??;

    Ok(())
  }
}

/// The write has already been committed when an event fails, so the caller
/// sees an error for a row that exists.
fn delivered(result: Result<(), Error>, topic: &str, user_id: &str) -> Result<(), Error> {
  result.map_err(|e| {
    tracing::error!(topic, user_id, error = %e, "user persisted but event was not delivered");
    Error::internal(
      EVENT_DELIVERY_FAILED,
      format!("{} event not delivered for user {}", topic, user_id),
    )
    .with_source(e)
  })
}

#[async_trait]
impl<R, E> UserService for UserServiceImpl<R, E>
where
  R: UserRepository,
  E: EventService,
{
  async fn list(&self, opts: &ListOptions) -> Result<UserList, Error> {
    self.repository.list(opts).await
  }

  async fn get(&self, id: &str) -> Result<User, Error> {
    self.repository.get(id).await
  }

  async fn save(&self, mut user: User) -> Result<User, Error> {
    if user.email.is_empty() {
      return Err(Error::invalid_argument(MISSING_EMAIL, "email is required"));
    }

    // Advisory only: the unique constraint on email is what actually guards concurrent creates.
    let existing = self.repository.list(&ListOptions::search_email(&user.email)).await?;
    if existing.total > 0 {
      return Err(user_already_exists(&user.email));
    }

    self.encode_password(&mut user).await?;

    let saved = self.repository.save(user).await?;
    tracing::info!(user_id = %saved.id, "created user");

    delivered(self.events.user_created(&saved).await, USER_CREATED, &saved.id)?;

    Ok(saved)
  }

  async fn update(&self, id: &str, mut user: User) -> Result<User, Error> {
    let current = self.repository.get(id).await?;

    user.id = current.id;
    user.email = current.email;

    if user.password.is_empty() {
      user.encoded_password = current.encoded_password;
    } else {
      self.encode_password(&mut user).await?;
    }

    let saved = self.repository.save(user).await?;
    tracing::info!(user_id = %saved.id, "updated user");

    delivered(self.events.user_updated(&saved).await, USER_UPDATED, &saved.id)?;

    Ok(saved)
  }

  async fn delete(&self, id: &str) -> Result<(), Error> {
    self.repository.delete(id).await?;
    tracing::info!(user_id = id, "deleted user");

    delivered(self.events.user_deleted(id).await, USER_DELETED, id)
  }
}

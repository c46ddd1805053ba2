use async_trait::async_trait;

use super::model::User;
use crate::error::Error;

pub const USER_CREATED: &str = "user.created";
pub const USER_UPDATED: &str = "user.updated";
pub const USER_DELETED: &str = "user.deleted";

/// Hook fired after a user mutation has been committed.
#[async_trait]
pub trait EventService: Send + Sync {
  async fn user_created(&self, user: &User) -> Result<(), Error>;
  async fn user_updated(&self, user: &User) -> Result<(), Error>;
  async fn user_deleted(&self, id: &str) -> Result<(), Error>;
}

/// Records events in the log instead of publishing them to a broker.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventService;

#[async_trait]
impl EventService for LogEventService {
  async fn user_created(&self, user: &User) -> Result<(), Error> {
    tracing::info!(topic = USER_CREATED, user_id = %user.id, "user event");
    Ok(())
  }

  async fn user_updated(&self, user: &User) -> Result<(), Error> {
    tracing::info!(topic = USER_UPDATED, user_id = %user.id, "user event");
    Ok(())
  }

  async fn user_deleted(&self, id: &str) -> Result<(), Error> {
    tracing::info!(topic = USER_DELETED, user_id = id, "user event");
    Ok(())
  }
}

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
  model::{user_already_exists, user_not_found, ListOptions, User, UserList},
  repository::UserRepository,
};
use crate::{
  error::Error,
  utils::clock::{system_clock, SharedClock},
};

/// In-memory [`UserRepository`] for development and tests.
///
/// Emulates the Postgres table, including the unique email constraint.
#[derive(Clone)]
pub struct InMemoryUserRepository {
  users: Arc<RwLock<HashMap<String, User>>>,
  clock: SharedClock,
}

impl Default for InMemoryUserRepository {
  fn default() -> Self {
    Self::new(system_clock())
  }
}

impl InMemoryUserRepository {
  pub fn new(clock: SharedClock) -> Self {
    Self {
      users: Arc::new(RwLock::new(HashMap::new())),
      clock,
    }
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn list(&self, opts: &ListOptions) -> Result<UserList, Error> {
    let users = self.users.read().await;
    let per_page = opts.effective_per_page();

    let mut matching: Vec<&User> = users.values().filter(|u| opts.matches(u)).collect();
    matching.sort_by(|a, b| a.email.cmp(&b.email));

    let total = matching.len() as u64;
    let offset = usize::try_from(opts.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(per_page.saturating_add(1)).unwrap_or(usize::MAX);

    let page = matching.into_iter().skip(offset).take(take).cloned().collect();

    Ok(UserList::from_lookahead(page, total, opts.page, per_page))
  }

  async fn get(&self, id: &str) -> Result<User, Error> {
    let users = self.users.read().await;
    users.get(id).cloned().ok_or_else(|| user_not_found(id))
  }

  async fn save(&self, mut user: User) -> Result<User, Error> {
    let mut users = self.users.write().await;

    if user.id.is_empty() {
      user.id = Uuid::new_v4().to_string();
    }

    let now = self.clock.now();

    if let Some(existing) = users.get_mut(&user.id) {
      existing.first_name = user.first_name;
      existing.last_name = user.last_name;
      existing.nickname = user.nickname;
      existing.encoded_password = user.encoded_password;
      existing.country = user.country;
      existing.updated_at = Some(now);

      tracing::debug!(user_id = %existing.id, "updated user");
      return Ok(existing.clone());
    }

    if users.values().any(|u| u.email == user.email) {
      return Err(user_already_exists(&user.email));
    }

    user.password.clear();
    user.created_at = Some(now);
    user.updated_at = Some(now);
    users.insert(user.id.clone(), user.clone());

    tracing::debug!(user_id = %user.id, "inserted user");
    Ok(user)
  }

  async fn delete(&self, id: &str) -> Result<(), Error> {
    let mut users = self.users.write().await;
    users.remove(id).map(|_| ()).ok_or_else(|| user_not_found(id))
  }
}

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
  domains::user::{
    event::LogEventService,
    memory::InMemoryUserRepository,
    repository::SqlxUserRepository,
    service::{UserService, UserServiceImpl},
  },
  utils::clock::system_clock,
};

#[derive(Clone)]
pub struct SharedAppState {
  pub user_service: Arc<dyn UserService>,
}

impl SharedAppState {
  pub fn new(pool: PgPool, password_cost: u32) -> Self {
    let user_repository = SqlxUserRepository::new(pool, system_clock());
    let user_service = UserServiceImpl::new(user_repository, LogEventService, password_cost);

    Self::with_service(Arc::new(user_service))
  }

  /// State backed by [`InMemoryUserRepository`], for local runs and tests.
  pub fn in_memory(password_cost: u32) -> Self {
    let user_service = UserServiceImpl::new(InMemoryUserRepository::default(), LogEventService, password_cost);

    Self::with_service(Arc::new(user_service))
  }

  pub fn with_service(user_service: Arc<dyn UserService>) -> Self {
    Self { user_service }
  }
}

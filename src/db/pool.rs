use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::Config;

pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
  PgPoolOptions::new()
    .max_connections(config.database_max_connections)
    .acquire_timeout(Duration::from_secs(5))
    .connect(&config.database_url)
    .await
}

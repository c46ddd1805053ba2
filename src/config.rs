use std::str::FromStr;

use anyhow::Context;

use crate::domains::user::service::DEFAULT_PASSWORD_COST;

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub database_max_connections: u32,
  pub host: String,
  pub port: u16,
  pub password_cost: u32,
  pub run_migrations: bool,
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let database_url = lookup("DATABASE_URL").context("DATABASE_URL environment variable must be set")?;

    Ok(Self {
      database_url,
      database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10),
      host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
      port: parse_or(&lookup, "APP_PORT", 8000),
      password_cost: parse_or(&lookup, "PASSWORD_GENERATION_COST", DEFAULT_PASSWORD_COST),
      run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", true),
    })
  }

  pub fn addr(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
  F: Fn(&str) -> Option<String>,
  T: FromStr,
{
  lookup(key).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

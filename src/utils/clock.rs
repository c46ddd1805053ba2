use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};

/// Source of "now" for server-assigned timestamps.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

pub type SharedClock = Arc<dyn Clock>;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  // Postgres keeps microseconds; truncating here keeps in-memory and stored values comparable.
  fn now(&self) -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
  }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> {
    self.0
  }
}

pub fn system_clock() -> SharedClock {
  Arc::new(SystemClock)
}

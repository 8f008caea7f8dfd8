//! Explicit store configuration, handed to [`crate::SqliteStore::open`].

use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

/// Where the account database lives and how long a writer waits for a lock
/// held by another process (e.g. the admin tooling).
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
  pub path:            PathBuf,
  #[serde(default = "default_busy_timeout_ms")]
  pub busy_timeout_ms: u64,
}

fn default_busy_timeout_ms() -> u64 { 5_000 }

impl StoreConfig {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), busy_timeout_ms: default_busy_timeout_ms() }
  }

  pub fn busy_timeout(&self) -> Duration { Duration::from_millis(self.busy_timeout_ms) }
}

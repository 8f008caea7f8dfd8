//! Gatehouse server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite account store, and serves the signup/approval API over HTTP.
//!
//! # Recording admin decisions
//!
//! Approval happens outside the server. For operators without other tooling,
//! the binary can apply a decision straight to the store and exit:
//!
//! ```
//! cargo run -p gatehouse-server --bin server -- --list-pending
//! cargo run -p gatehouse-server --bin server -- --review a@x.com --decision approved
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::{Context as _, bail};
use clap::{Parser, ValueEnum};
use gatehouse_api::Argon2Hasher;
use gatehouse_core::{account::ApprovalStatus, registry::Registry};
use gatehouse_server::ServerConfig;
use gatehouse_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Gatehouse signup approval server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print every account still awaiting a decision and exit.
  #[arg(long, conflicts_with = "review")]
  list_pending: bool,

  /// Apply an admin decision to this email and exit.
  #[arg(long, value_name = "EMAIL", requires = "decision")]
  review: Option<String>,

  /// Decision applied by `--review`.
  #[arg(long, value_enum, requires = "review")]
  decision: Option<Decision>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Decision {
  Approved,
  Rejected,
}

impl From<Decision> for ApprovalStatus {
  fn from(d: Decision) -> Self {
    match d {
      Decision::Approved => ApprovalStatus::Approved,
      Decision::Rejected => ApprovalStatus::Rejected,
    }
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 3001)?
    .set_default("store.path", "gatehouse.db")?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("GATEHOUSE")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  server_cfg.store.path = expand_tilde(&server_cfg.store.path);

  // Open SQLite store.
  let store = SqliteStore::open(&server_cfg.store)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store.path))?;

  // Helper modes: act on the store and exit.
  if cli.list_pending {
    for account in store.list_by_status(ApprovalStatus::Pending).await? {
      println!(
        "{}\t{} {}\t{}",
        account.email,
        account.given_name,
        account.family_name,
        account.created_at.to_rfc3339()
      );
    }
    return Ok(());
  }
  if let (Some(email), Some(decision)) = (cli.review, cli.decision) {
    let status = ApprovalStatus::from(decision);
    if !store.set_status(&email, status).await? {
      bail!("no account for {email}");
    }
    tracing::info!(%email, %status, "decision recorded");
    return Ok(());
  }

  let registry = Arc::new(Registry::new(store, Argon2Hasher::default()));
  let app = gatehouse_server::router(registry, &server_cfg).context("invalid cors_origin")?;
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::warn!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

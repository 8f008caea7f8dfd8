//! `gatehouse`: command-line client for the Gatehouse signup server.
//!
//! # Usage
//!
//! ```
//! gatehouse signup --email a@x.com --first-name Ada --last-name Byron
//! gatehouse wait --email a@x.com --backoff 2 --max-attempts 20
//! gatehouse login --email a@x.com
//! gatehouse --config ~/.config/gatehouse/config.toml status --email a@x.com
//! ```

mod app;
mod client;
mod poll;

use std::{
  path::PathBuf,
  process::ExitCode,
  time::Duration,
};

use anyhow::{Context, Result};
use app::AfterSignup;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use gatehouse_core::wire::{LoginBody, SignupBody};
use poll::PollPolicy;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "gatehouse", about = "Sign up, wait for approval, and log in")]
struct Args {
  /// Path to a TOML config file (url, timeout_secs, [poll]).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the gatehouse server (default: http://localhost:3001).
  #[arg(long, env = "GATEHOUSE_URL")]
  url: Option<String>,

  /// Per-request timeout in seconds (default: 10).
  #[arg(long)]
  timeout_secs: Option<u64>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Submit a signup request, then wait for the admin's decision.
  Signup {
    #[arg(long)]
    email:      String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name:  String,
    /// Prompted for on stdin when omitted.
    #[arg(long, env = "GATEHOUSE_PASSWORD", hide_env_values = true)]
    password:   Option<String>,
    /// Return right after submitting instead of waiting for a decision.
    #[arg(long)]
    no_wait:    bool,
    #[command(flatten)]
    poll:       PollArgs,
  },
  /// Print the current approval status.
  Status {
    #[arg(long)]
    email: String,
  },
  /// Log in to an approved account.
  Login {
    #[arg(long)]
    email:    String,
    /// Prompted for on stdin when omitted.
    #[arg(long, env = "GATEHOUSE_PASSWORD", hide_env_values = true)]
    password: Option<String>,
  },
  /// Poll until the admin approves or rejects the account.
  Wait {
    #[arg(long)]
    email: String,
    #[command(flatten)]
    poll:  PollArgs,
  },
}

#[derive(clap::Args, Debug)]
struct PollArgs {
  /// Seconds between status checks (default: 3).
  #[arg(long)]
  interval_secs:     Option<u64>,
  /// Multiply the gap after every check by this factor (default: 1, no backoff).
  #[arg(long)]
  backoff:           Option<f64>,
  /// Longest gap between checks when backing off (default: 60).
  #[arg(long)]
  max_interval_secs: Option<u64>,
  /// Give up after this many checks (default: never).
  #[arg(long)]
  max_attempts:      Option<u32>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:          String,
  #[serde(default)]
  timeout_secs: Option<u64>,
  #[serde(default)]
  poll:         PollFile,
}

#[derive(Deserialize, Default)]
struct PollFile {
  interval_secs:     Option<u64>,
  backoff:           Option<f64>,
  max_interval_secs: Option<u64>,
  max_attempts:      Option<u32>,
}

impl PollArgs {
  /// Flags override the config file, which overrides [`PollPolicy::default`].
  fn policy(&self, file: &PollFile) -> PollPolicy {
    let defaults = PollPolicy::default();
    PollPolicy {
      interval:     self
        .interval_secs
        .or(file.interval_secs)
        .map_or(defaults.interval, Duration::from_secs),
      multiplier:   self.backoff.or(file.backoff).unwrap_or(defaults.multiplier),
      max_interval: self
        .max_interval_secs
        .or(file.max_interval_secs)
        .map_or(defaults.max_interval, Duration::from_secs),
      max_attempts: self.max_attempts.or(file.max_attempts),
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:3001".to_string()),
    timeout:  Duration::from_secs(args.timeout_secs.or(file_cfg.timeout_secs).unwrap_or(10)),
  };
  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::Signup { email, first_name, last_name, password, no_wait, poll } => {
      let password = match password {
        Some(p) => p,
        None => prompt_password()?,
      };
      let then = if no_wait {
        AfterSignup::Return
      } else {
        AfterSignup::Wait(poll.policy(&file_cfg.poll))
      };
      let body = SignupBody { email, first_name, last_name, password };
      app::signup(&client, body, then).await
    }
    Command::Status { email } => app::status(&client, &email).await,
    Command::Login { email, password } => {
      let password = match password {
        Some(p) => p,
        None => prompt_password()?,
      };
      app::login(&client, LoginBody { email, password }).await
    }
    Command::Wait { email, poll } => app::wait(&client, &email, poll.policy(&file_cfg.poll)).await,
  }
}

/// Read a password from stdin.
fn prompt_password() -> Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

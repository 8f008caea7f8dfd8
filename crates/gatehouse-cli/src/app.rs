//! Command handlers: each talks to the API, prints what happened, and picks
//! the process exit code.

use std::process::ExitCode;

use anyhow::Result;
use gatehouse_core::{
  account::ApprovalStatus,
  wire::{LoginBody, SignupBody, SignupResponse},
};
use tokio_util::sync::CancellationToken;

use crate::{
  client::{ApiClient, Outcome, Refusal},
  poll::{PollOutcome, PollPolicy, Poller},
};

/// Exit code used when the user interrupts a wait.
const INTERRUPTED: u8 = 130;

/// What to do after the server has accepted (or already holds) a signup.
pub enum AfterSignup {
  Return,
  Wait(PollPolicy),
}

// ─── Signup ───────────────────────────────────────────────────────────────────

/// Where a signup leaves the user once the server has answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignupNext {
  /// Submitted now or earlier; the decision is still outstanding.
  AwaitDecision,
  AlreadyApproved,
  Stop,
}

fn signup_next(outcome: &Outcome<SignupResponse>) -> SignupNext {
  match outcome {
    Outcome::Accepted(_) => SignupNext::AwaitDecision,
    Outcome::Refused(refusal) => match refusal.body.approval_status {
      Some(ApprovalStatus::Pending) => SignupNext::AwaitDecision,
      Some(ApprovalStatus::Approved) => SignupNext::AlreadyApproved,
      Some(ApprovalStatus::Rejected) | None => SignupNext::Stop,
    },
  }
}

pub async fn signup(client: &ApiClient, body: SignupBody, then: AfterSignup) -> Result<ExitCode> {
  let email = body.email.clone();

  let outcome = client.signup(&body).await?;
  match &outcome {
    Outcome::Accepted(resp) => println!("{}", resp.message),
    Outcome::Refused(refusal) => println!("{}", refusal.body.message),
  }

  match (signup_next(&outcome), then) {
    (SignupNext::AwaitDecision, AfterSignup::Wait(policy)) => wait(client, &email, policy).await,
    (SignupNext::AwaitDecision, AfterSignup::Return) => Ok(ExitCode::SUCCESS),
    (SignupNext::AlreadyApproved, _) => {
      println!("Log in with `gatehouse login --email {email}`.");
      Ok(ExitCode::SUCCESS)
    }
    (SignupNext::Stop, _) => Ok(ExitCode::FAILURE),
  }
}

// ─── Status ───────────────────────────────────────────────────────────────────

pub async fn status(client: &ApiClient, email: &str) -> Result<ExitCode> {
  match client.check_status(email).await? {
    Outcome::Accepted(resp) => {
      println!("{}", resp.approval_status);
      Ok(ExitCode::SUCCESS)
    }
    Outcome::Refused(refusal) => Ok(refused(&refusal)),
  }
}

// ─── Login ────────────────────────────────────────────────────────────────────

pub async fn login(client: &ApiClient, body: LoginBody) -> Result<ExitCode> {
  match client.login(&body).await? {
    Outcome::Accepted(resp) if resp.login_success => {
      println!("Approved and password verified. You are logged in.");
      Ok(ExitCode::SUCCESS)
    }
    Outcome::Accepted(_) => {
      println!("Login was not confirmed by the server.");
      Ok(ExitCode::FAILURE)
    }
    Outcome::Refused(refusal) => Ok(refused(&refusal)),
  }
}

// ─── Wait ─────────────────────────────────────────────────────────────────────

/// Poll until the admin decides, the policy gives up, or the user hits Ctrl-C.
pub async fn wait(client: &ApiClient, email: &str, policy: PollPolicy) -> Result<ExitCode> {
  let cancel = CancellationToken::new();
  let interrupt = tokio::spawn({
    let cancel = cancel.clone();
    async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        cancel.cancel();
      }
    }
  });

  println!("Waiting for admin approval of {email}… (Ctrl-C to stop)");
  let outcome = Poller::new(client.clone(), policy, cancel).run(email).await;
  interrupt.abort();

  Ok(report(outcome))
}

fn report(outcome: PollOutcome) -> ExitCode {
  match outcome {
    PollOutcome::Approved => {
      println!("Approved. Please log in with your password.");
      ExitCode::SUCCESS
    }
    PollOutcome::Rejected => {
      println!("Rejected by admin. You cannot proceed.");
      ExitCode::FAILURE
    }
    PollOutcome::Cancelled => {
      println!("Stopped waiting. Run `gatehouse wait` to resume.");
      ExitCode::from(INTERRUPTED)
    }
    PollOutcome::GaveUp { attempts } => {
      println!("Still pending after {attempts} checks; giving up. Run `gatehouse wait` to resume.");
      ExitCode::FAILURE
    }
  }
}

fn refused(refusal: &Refusal) -> ExitCode {
  tracing::debug!(status = %refusal.status, "request refused");
  println!("{}", refusal.body.message);
  ExitCode::FAILURE
}

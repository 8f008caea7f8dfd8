//! Waiting for an admin decision.
//!
//! A [`Poller`] repeatedly asks a [`StatusSource`] for the approval status of
//! one email until the answer is terminal, the caller cancels, or the
//! [`PollPolicy`] runs out of attempts.
//!
//! - `approved` / `rejected` end the loop.
//! - `pending` and every kind of failure are treated alike: log and keep going.
//! - One request per tick. Ticks that pass while a slow request is in flight
//!   are skipped, never queued.
//! - The cancellation token is checked before each tick and raced against
//!   both the sleep and the in-flight request.

use std::{future::Future, time::Duration};

use gatehouse_core::account::ApprovalStatus;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

// ─── Source ───────────────────────────────────────────────────────────────────

/// Anything that can report an email's current approval status.
pub trait StatusSource: Send + Sync {
  fn fetch_status<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = anyhow::Result<ApprovalStatus>> + Send + 'a;
}

// ─── Policy ───────────────────────────────────────────────────────────────────

/// Tick spacing and stopping rule.
///
/// The default polls every 3 seconds forever. A `multiplier` above 1 stretches
/// each successive gap up to `max_interval`; `max_attempts` turns an endless
/// wait into [`PollOutcome::GaveUp`].
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
  pub interval:     Duration,
  pub multiplier:   f64,
  pub max_interval: Duration,
  pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
  fn default() -> Self {
    Self {
      interval:     Duration::from_secs(3),
      multiplier:   1.0,
      max_interval: Duration::from_secs(60),
      max_attempts: None,
    }
  }
}

/// Below this a skipped-tick computation would spin.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

impl PollPolicy {
  /// Gap before the tick following `completed` earlier ticks.
  pub fn delay(&self, completed: u32) -> Duration {
    let base = self.interval.max(MIN_INTERVAL);
    let cap = self.max_interval.max(base);
    let factor = self.multiplier.max(1.0).powi(completed.min(i32::MAX as u32) as i32);
    let secs = base.as_secs_f64() * factor;
    if !secs.is_finite() || secs >= cap.as_secs_f64() {
      return cap;
    }
    Duration::from_secs_f64(secs)
  }
}

// ─── Outcome ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
  Approved,
  Rejected,
  Cancelled,
  /// `max_attempts` checks came back without a decision.
  GaveUp { attempts: u32 },
}

// ─── Poller ───────────────────────────────────────────────────────────────────

/// One polling session for one email.
pub struct Poller<S> {
  source: S,
  policy: PollPolicy,
  cancel: CancellationToken,
}

impl<S: StatusSource> Poller<S> {
  pub fn new(source: S, policy: PollPolicy, cancel: CancellationToken) -> Self {
    Self { source, policy, cancel }
  }

  /// Poll until a terminal outcome. The first check happens one interval
  /// after the call.
  pub async fn run(&self, email: &str) -> PollOutcome {
    let mut attempts: u32 = 0;
    let mut deadline = Instant::now();

    loop {
      if self.cancel.is_cancelled() {
        return PollOutcome::Cancelled;
      }
      if let Some(max) = self.policy.max_attempts
        && attempts >= max
      {
        return PollOutcome::GaveUp { attempts };
      }

      let delay = self.policy.delay(attempts);
      let Some(next) = next_tick(deadline, delay) else {
        warn!(?delay, "poll interval is beyond the clock's range; waiting until cancelled");
        self.cancel.cancelled().await;
        return PollOutcome::Cancelled;
      };
      deadline = next;

      tokio::select! {
        _ = self.cancel.cancelled() => return PollOutcome::Cancelled,
        _ = tokio::time::sleep_until(deadline) => {}
      }

      attempts += 1;
      let result = tokio::select! {
        _ = self.cancel.cancelled() => return PollOutcome::Cancelled,
        result = self.source.fetch_status(email) => result,
      };

      match result {
        Ok(ApprovalStatus::Approved) => return PollOutcome::Approved,
        Ok(ApprovalStatus::Rejected) => return PollOutcome::Rejected,
        Ok(ApprovalStatus::Pending) => debug!(email, attempts, "still pending"),
        Err(e) => warn!(email, attempts, error = %e, "status check failed; will retry"),
      }
    }
  }
}

/// The tick `delay` after `prev`, pushed forward past any ticks already
/// missed. `None` when the tick cannot be represented as an [`Instant`].
fn next_tick(prev: Instant, delay: Duration) -> Option<Instant> {
  let next = prev.checked_add(delay)?;
  let now = Instant::now();
  if next >= now {
    return Some(next);
  }
  let skipped = (now - next).as_nanos() / delay.as_nanos() + 1;
  debug!(skipped, "status check overran its interval; skipping ticks");
  next.checked_add(delay.checked_mul(u32::try_from(skipped).ok()?)?)
}

//! Error taxonomy for `gatehouse-core`.
//!
//! Every variant except [`Error::Internal`] is decided by inspecting business
//! state. `Internal` wraps storage and hashing failures; its source must never
//! be shown to callers.

use thiserror::Error;

use crate::account::ApprovalStatus;

#[derive(Debug, Error)]
pub enum Error {
  /// Missing or invalid input. Not retryable without fixing the input.
  #[error("{0}")]
  BadRequest(String),

  /// The identity already has a record; the caller should poll instead of
  /// signing up again.
  #[error("{}", conflict_message(.status))]
  Conflict { status: ApprovalStatus },

  /// A rejected identity, or a login attempt before approval. `status` is
  /// `Pending` or `Rejected`; the registry never forbids an approved account.
  #[error("{}", forbidden_message(.status))]
  Forbidden { status: ApprovalStatus },

  /// Wrong secret for an approved identity.
  #[error("Incorrect password.")]
  Unauthorized,

  #[error("User not found.")]
  NotFound,

  /// Storage or hashing failure. Transient.
  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a collaborator failure as [`Error::Internal`].
  pub fn internal<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Internal(Box::new(err))
  }

  /// The approval status this error was derived from, if any.
  pub fn status(&self) -> Option<ApprovalStatus> {
    match self {
      Self::Conflict { status } | Self::Forbidden { status } => Some(*status),
      _ => None,
    }
  }
}

fn conflict_message(status: &ApprovalStatus) -> &'static str {
  match status {
    ApprovalStatus::Pending => "Request already submitted. Please wait for approval.",
    ApprovalStatus::Approved => "Email already exists and is approved.",
    ApprovalStatus::Rejected => "Your request was rejected by admin.",
  }
}

fn forbidden_message(status: &ApprovalStatus) -> &'static str {
  match status {
    ApprovalStatus::Pending => "Not yet approved by admin.",
    ApprovalStatus::Rejected => "Your request was rejected by admin.",
    // Not constructed by the registry.
    ApprovalStatus::Approved => "Access denied.",
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

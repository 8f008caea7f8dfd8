//! Account records and the approval status they carry.
//!
//! An account is keyed by its email address, compared byte-for-byte. The
//! email never changes once the record exists; only the approval status is
//! ever rewritten, and only by the external admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Approval status ─────────────────────────────────────────────────────────

/// Where an account sits in the approval lifecycle.
///
/// `Pending` moves to `Approved` or `Rejected` exactly once; both are terminal
/// as far as this crate is concerned.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApprovalStatus {
  Pending,
  Approved,
  Rejected,
}

impl ApprovalStatus {
  pub fn is_terminal(self) -> bool { !matches!(self, Self::Pending) }
}

// ─── Account ─────────────────────────────────────────────────────────────────

/// A persisted account record.
#[derive(Debug, Clone)]
pub struct Account {
  /// Server-assigned surrogate id; never changes after creation.
  pub account_id:    Uuid,
  /// The identity. Primary key, case-sensitive.
  pub email:         String,
  pub given_name:    String,
  pub family_name:   String,
  /// PHC string produced by the configured hasher.
  pub password_hash: String,
  pub status:        ApprovalStatus,
  pub created_at:    DateTime<Utc>,
}

impl Account {
  /// Build a fresh `Pending` record for a signup.
  pub fn pending(signup: &Signup, password_hash: String) -> Self {
    Self {
      account_id: Uuid::new_v4(),
      email: signup.email.clone(),
      given_name: signup.given_name.clone(),
      family_name: signup.family_name.clone(),
      password_hash,
      status: ApprovalStatus::Pending,
      created_at: Utc::now(),
    }
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::registry::Registry::signup`].
#[derive(Clone)]
pub struct Signup {
  pub email:       String,
  pub given_name:  String,
  pub family_name: String,
  pub secret:      String,
}

impl Signup {
  /// Every field is required. Values are kept verbatim; only blank values are
  /// refused.
  pub fn validate(&self) -> Result<()> {
    require("email", &self.email)?;
    require("firstName", &self.given_name)?;
    require("lastName", &self.family_name)?;
    require("password", &self.secret)
  }
}

/// Input to [`crate::registry::Registry::login`].
#[derive(Clone)]
pub struct Credentials {
  pub email:  String,
  pub secret: String,
}

impl Credentials {
  pub fn validate(&self) -> Result<()> {
    require("email", &self.email)?;
    require("password", &self.secret)
  }
}

fn require(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::BadRequest(format!("Missing required field: {field}")));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  fn signup() -> Signup {
    Signup {
      email:       "a@x.com".into(),
      given_name:  "A".into(),
      family_name: "B".into(),
      secret:      "pw1".into(),
    }
  }

  #[test]
  fn status_strings_are_lowercase() {
    assert_eq!(ApprovalStatus::Pending.to_string(), "pending");
    assert_eq!(ApprovalStatus::Approved.as_ref(), "approved");
    assert_eq!(
      ApprovalStatus::from_str("rejected").unwrap(),
      ApprovalStatus::Rejected
    );
    assert!(ApprovalStatus::from_str("Approved").is_err());
  }

  #[test]
  fn only_pending_is_non_terminal() {
    assert!(!ApprovalStatus::Pending.is_terminal());
    assert!(ApprovalStatus::Approved.is_terminal());
    assert!(ApprovalStatus::Rejected.is_terminal());
  }

  #[test]
  fn pending_account_copies_profile() {
    let account = Account::pending(&signup(), "hash".into());
    assert_eq!(account.email, "a@x.com");
    assert_eq!(account.status, ApprovalStatus::Pending);
    assert_eq!(account.password_hash, "hash");
  }

  #[test]
  fn blank_fields_are_rejected() {
    let mut s = signup();
    s.family_name = "   ".into();
    match s.validate() {
      Err(Error::BadRequest(msg)) => assert!(msg.contains("lastName"), "{msg}"),
      other => panic!("expected BadRequest, got {other:?}"),
    }

    let creds = Credentials { email: "a@x.com".into(), secret: String::new() };
    assert!(matches!(creds.validate(), Err(Error::BadRequest(_))));
  }
}

//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, statuses as their lowercase names.

use std::str::FromStr as _;

use chrono::{DateTime, Utc};
use gatehouse_core::account::{Account, ApprovalStatus};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ApprovalStatus ───────────────────────────────────────────────────────────

pub fn encode_status(status: ApprovalStatus) -> &'static str { status.into() }

pub fn decode_status(s: &str) -> Result<ApprovalStatus> {
  ApprovalStatus::from_str(s).map_err(|_| Error::UnknownStatus(s.to_owned()))
}

// ─── Raw rows ─────────────────────────────────────────────────────────────────

/// Column order used by every `SELECT` in the store.
pub const ACCOUNT_COLUMNS: &str =
  "email, account_id, given_name, family_name, password_hash, status, created_at";

/// An `accounts` row as read, before any decoding.
pub struct RawAccount {
  pub email:         String,
  pub account_id:    String,
  pub given_name:    String,
  pub family_name:   String,
  pub password_hash: String,
  pub status:        String,
  pub created_at:    String,
}

impl RawAccount {
  /// Read a row selected with [`ACCOUNT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      email:         row.get(0)?,
      account_id:    row.get(1)?,
      given_name:    row.get(2)?,
      family_name:   row.get(3)?,
      password_hash: row.get(4)?,
      status:        row.get(5)?,
      created_at:    row.get(6)?,
    })
  }

  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      account_id:    decode_uuid(&self.account_id)?,
      email:         self.email,
      given_name:    self.given_name,
      family_name:   self.family_name,
      password_hash: self.password_hash,
      status:        decode_status(&self.status)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_round_trips_through_column_text() {
    for status in [
      ApprovalStatus::Pending,
      ApprovalStatus::Approved,
      ApprovalStatus::Rejected,
    ] {
      assert_eq!(encode_status(status), status.to_string());
      assert_eq!(decode_status(encode_status(status)).unwrap(), status);
    }
  }

  #[test]
  fn unknown_status_is_reported_verbatim() {
    match decode_status("Approved") {
      Err(Error::UnknownStatus(s)) => assert_eq!(s, "Approved"),
      other => panic!("expected UnknownStatus, got {other:?}"),
    }
  }

  #[test]
  fn bad_timestamp_is_a_date_parse_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}

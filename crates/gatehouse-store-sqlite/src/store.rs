//! [`SqliteStore`]: the SQLite implementation of [`AccountStore`].

use rusqlite::OptionalExtension as _;
use tracing::debug;

use gatehouse_core::{
  account::{Account, ApprovalStatus},
  store::{AccountStore, InsertOutcome},
};

use crate::{
  Result,
  config::StoreConfig,
  encode::{ACCOUNT_COLUMNS, RawAccount, encode_dt, encode_status, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An account store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) the store described by `config` and run schema
  /// initialisation.
  pub async fn open(config: &StoreConfig) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(&config.path).await?;
    let store = Self { conn };
    store.init(config.busy_timeout()).await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init(std::time::Duration::ZERO).await?;
    Ok(store)
  }

  async fn init(&self, busy_timeout: std::time::Duration) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Admin path ────────────────────────────────────────────────────────────

  /// Record an admin decision. Returns `false` if no such account exists.
  ///
  /// This is the external mutation the server itself never performs; it
  /// exists for operator tooling.
  pub async fn set_status(&self, email: &str, status: ApprovalStatus) -> Result<bool> {
    let email_owned = email.to_owned();
    let status_str = encode_status(status);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE accounts SET status = ?2 WHERE email = ?1",
          rusqlite::params![email_owned, status_str],
        )?)
      })
      .await?;

    debug!(email, %status, changed, "status updated");
    Ok(changed > 0)
  }

  /// List accounts in `status`, oldest first.
  pub async fn list_by_status(&self, status: ApprovalStatus) -> Result<Vec<Account>> {
    let status_str = encode_status(status);

    let raws: Vec<RawAccount> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE status = ?1 ORDER BY created_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![status_str], RawAccount::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAccount::into_account).collect()
  }
}

// ─── AccountStore impl ───────────────────────────────────────────────────────

impl AccountStore for SqliteStore {
  type Error = crate::Error;

  async fn insert_if_absent(&self, account: Account) -> Result<InsertOutcome> {
    let email         = account.email.clone();
    let account_id    = encode_uuid(account.account_id);
    let status        = encode_status(account.status);
    let created_at    = encode_dt(account.created_at);
    let Account { given_name, family_name, password_hash, .. } = account;

    // A single statement, so the existence check and the write cannot be
    // interleaved with another insert for the same email.
    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO accounts (
             email, account_id, given_name, family_name,
             password_hash, status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT(email) DO NOTHING",
          rusqlite::params![
            email,
            account_id,
            given_name,
            family_name,
            password_hash,
            status,
            created_at,
          ],
        )?)
      })
      .await?;

    Ok(if inserted == 1 { InsertOutcome::Created } else { InsertOutcome::Conflict })
  }

  async fn get(&self, email: &str) -> Result<Option<Account>> {
    let email = email.to_owned();

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?1"),
            rusqlite::params![email],
            RawAccount::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }
}

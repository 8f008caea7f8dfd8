//! The `AccountStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `gatehouse-store-sqlite`).
//! The registry depends on this abstraction, not on any concrete backend.
//!
//! There is no update method. Status changes come from the
//! external admin, which writes to the backing store directly; this crate only
//! ever reads them back.

use std::future::Future;

use crate::account::Account;

/// Result of [`AccountStore::insert_if_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
  /// No record existed; the new one was written.
  Created,
  /// A record with the same email already existed and was left untouched.
  Conflict,
}

/// Abstraction over an account store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AccountStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist `account` only if no record with the same email exists.
  ///
  /// Must be atomic with respect to concurrent inserts of the same email:
  /// exactly one caller observes [`InsertOutcome::Created`].
  fn insert_if_absent(
    &self,
    account: Account,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + '_;

  /// Retrieve an account by email. Returns `None` if not found.
  fn get<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + 'a;
}

//! The approval state machine.
//!
//! From the point of view of one email, an account is in one of four states:
//!
//! ```text
//!   no-record ──signup──▶ pending ──(admin)──▶ approved
//!                            │
//!                            └──────(admin)──▶ rejected
//! ```
//!
//! [`Registry::signup`] is the only transition this crate performs. The admin
//! transitions happen elsewhere and are observed through
//! [`Registry::check_status`] and [`Registry::login`].
//!
//! Duplicate signups are detected by the store's insert-if-absent, never by a
//! read beforehand. The existing record is read only once the insert has
//! reported a conflict, so the conflict message always describes the record
//! that actually won the race (or whatever the admin has since made of it).

use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  account::{Account, ApprovalStatus, Credentials, Signup},
  hasher::CredentialHasher,
  store::{AccountStore, InsertOutcome},
};

/// Successful signup: the account now exists and awaits an admin decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submitted;

impl Submitted {
  pub const MESSAGE: &'static str = "Request submitted for admin approval.";
}

/// Signup, status checks and login over an [`AccountStore`] and a
/// [`CredentialHasher`].
///
/// Holds no mutable state of its own; share it behind an `Arc`.
pub struct Registry<S, H> {
  store:  S,
  hasher: H,
}

impl<S, H> Registry<S, H>
where
  S: AccountStore,
  H: CredentialHasher,
{
  pub fn new(store: S, hasher: H) -> Self { Self { store, hasher } }

  /// Create a `Pending` account, or explain why one already exists.
  pub async fn signup(&self, signup: Signup) -> Result<Submitted> {
    signup.validate()?;
    info!(
      email = %signup.email,
      given_name = %signup.given_name,
      family_name = %signup.family_name,
      "received signup"
    );

    let password_hash = self.hasher.hash(&signup.secret).map_err(Error::internal)?;
    let account = Account::pending(&signup, password_hash);

    match self
      .store
      .insert_if_absent(account)
      .await
      .map_err(Error::internal)?
    {
      InsertOutcome::Created => {
        info!(email = %signup.email, "account created, awaiting approval");
        Ok(Submitted)
      }
      InsertOutcome::Conflict => Err(self.conflict(&signup.email).await),
    }
  }

  /// Read back the record that beat this signup and turn it into an error.
  async fn conflict(&self, email: &str) -> Error {
    let existing = match self.store.get(email).await {
      Ok(Some(account)) => account,
      Ok(None) => {
        warn!(email, "insert reported a conflict but no record was found");
        return Error::Internal("account vanished during duplicate check".into());
      }
      Err(e) => return Error::internal(e),
    };

    info!(email, status = %existing.status, "signup conflicts with existing account");
    match existing.status {
      ApprovalStatus::Rejected => Error::Forbidden { status: ApprovalStatus::Rejected },
      status => Error::Conflict { status },
    }
  }

  /// Current approval status, verbatim.
  pub async fn check_status(&self, email: &str) -> Result<ApprovalStatus> {
    let account = self
      .store
      .get(email)
      .await
      .map_err(Error::internal)?
      .ok_or(Error::NotFound)?;
    debug!(email, status = %account.status, "status check");
    Ok(account.status)
  }

  /// Succeeds only for an approved account with a matching secret.
  ///
  /// The secret is not looked at until the account is known to be approved.
  pub async fn login(&self, credentials: Credentials) -> Result<()> {
    credentials.validate()?;

    let account = self
      .store
      .get(&credentials.email)
      .await
      .map_err(Error::internal)?
      .ok_or(Error::NotFound)?;

    match account.status {
      ApprovalStatus::Approved => {}
      status => {
        info!(email = %credentials.email, %status, "login refused before approval");
        return Err(Error::Forbidden { status });
      }
    }

    let matches = self
      .hasher
      .verify(&credentials.secret, &account.password_hash)
      .map_err(Error::internal)?;
    if !matches {
      info!(email = %credentials.email, "login with incorrect password");
      return Err(Error::Unauthorized);
    }

    info!(email = %credentials.email, "login succeeded");
    Ok(())
  }
}

//! Argon2id implementation of [`CredentialHasher`].

use argon2::{
  Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
  password_hash::{self, SaltString},
};
use gatehouse_core::hasher::CredentialHasher;
use rand_core::OsRng;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("argon2 error: {0}")]
pub struct HashError(String);

impl From<password_hash::Error> for HashError {
  fn from(e: password_hash::Error) -> Self { Self(e.to_string()) }
}

/// Produces PHC strings (`$argon2id$v=19$…`) with a fresh random salt each time.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
  argon2: Argon2<'static>,
}

impl Argon2Hasher {
  /// Use explicit cost parameters instead of the argon2 crate defaults.
  pub fn with_params(params: Params) -> Self {
    Self { argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params) }
  }
}

impl CredentialHasher for Argon2Hasher {
  type Error = HashError;

  fn hash(&self, secret: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(self.argon2.hash_password(secret.as_bytes(), &salt)?.to_string())
  }

  fn verify(&self, secret: &str, hash: &str) -> Result<bool, HashError> {
    let parsed = PasswordHash::new(hash)?;
    match self.argon2.verify_password(secret.as_bytes(), &parsed) {
      Ok(()) => Ok(true),
      Err(password_hash::Error::Password) => Ok(false),
      Err(e) => Err(e.into()),
    }
  }
}

//! The one-way credential hashing seam.

/// Hashes secrets for storage and checks candidates against stored hashes.
pub trait CredentialHasher: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn hash(&self, secret: &str) -> Result<String, Self::Error>;

  /// `Ok(false)` means the secret does not match. `Err` is reserved for a
  /// hash that cannot be checked at all (malformed, unsupported algorithm).
  fn verify(&self, secret: &str, hash: &str) -> Result<bool, Self::Error>;
}

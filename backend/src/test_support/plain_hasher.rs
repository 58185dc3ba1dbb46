//! Deterministic stand-in for the Argon2 adapter.

use crate::domain::ports::{PasswordHashError, PasswordHasher};

const PREFIX: &str = "plain$";

/// Stores passwords as `plain$<password>`; only fit for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextHasher;

impl PasswordHasher for PlainTextHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("{PREFIX}{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        hash.strip_prefix(PREFIX)
            .map(|stored| stored == password)
            .ok_or_else(|| PasswordHashError::malformed_hash("missing plain$ prefix"))
    }
}

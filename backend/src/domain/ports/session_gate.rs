//! Driving port deciding whether a request may proceed.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::session_token::SessionIdentity;

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No session cookie was presented.
    NoCredential,
    /// The token failed verification or has expired.
    InvalidCredential,
    /// The account has been blocked since the token was issued.
    Blocked,
    /// The account behind the token no longer exists.
    NotFound,
}

/// Outcome of checking a session credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// The caller is authenticated as `identity`.
    Allow(SessionIdentity),
    /// The caller is refused.
    Deny(DenyReason),
}

/// Access gate applied to every protected route.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionGate: Send + Sync {
    /// Decide on the raw `auth-token` value, if any.
    ///
    /// A store failure is returned as `Err`; it never yields `Allow`.
    async fn authorize(&self, credential: Option<String>) -> Result<AccessDecision, Error>;
}

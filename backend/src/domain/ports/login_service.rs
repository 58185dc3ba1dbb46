//! Driving port for login.
//!
//! Inbound adapters call it to exchange credentials for a session token
//! without knowing how users are stored or passwords hashed.

use async_trait::async_trait;

use crate::domain::session_token::SessionToken;
use crate::domain::{Error, LoginCredentials, User};

/// Successful login: the account and a freshly signed token.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: SessionToken,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Check credentials and mint a session token.
    ///
    /// Unknown emails and wrong passwords are indistinguishable
    /// (`unauthorized`); blocked accounts get `forbidden`.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error>;
}

//! Access gate guarding protected routes.
//!
//! A valid token is necessary but not sufficient: the account is re-read on
//! every request so blocking or deleting a user takes effect immediately,
//! even for tokens issued earlier.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::Error;
use crate::domain::ports::{AccessDecision, DenyReason, SessionGate, UserRepository};
use crate::domain::session_token::{AuthConfig, SessionIdentity, verify};

/// [`SessionGate`] backed by the token codec and the user store.
#[derive(Clone)]
pub struct AccessGate<U> {
    users: Arc<U>,
    config: Arc<AuthConfig>,
    clock: Arc<dyn Clock>,
}

impl<U> AccessGate<U> {
    /// Create a gate reading accounts from `users`.
    pub fn new(users: Arc<U>, config: Arc<AuthConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            config,
            clock,
        }
    }
}

#[async_trait]
impl<U> SessionGate for AccessGate<U>
where
    U: UserRepository,
{
    async fn authorize(&self, credential: Option<String>) -> Result<AccessDecision, Error> {
        let Some(token) = credential.filter(|token| !token.is_empty()) else {
            return Ok(AccessDecision::Deny(DenyReason::NoCredential));
        };

        let claimed = match verify(&token, &self.config, self.clock.utc()) {
            Ok(identity) => identity,
            Err(error) => {
                tracing::debug!(%error, "session token rejected");
                return Ok(AccessDecision::Deny(DenyReason::InvalidCredential));
            }
        };

        let Some(user) = self.users.find_by_id(&claimed.user_id).await? else {
            tracing::info!(user_id = %claimed.user_id, "session refers to a missing user");
            return Ok(AccessDecision::Deny(DenyReason::NotFound));
        };
        if user.is_blocked {
            tracing::info!(user_id = %user.id, "session refused for blocked user");
            return Ok(AccessDecision::Deny(DenyReason::Blocked));
        }

        Ok(AccessDecision::Allow(SessionIdentity {
            user_id: user.id,
            email: user.email,
            role: user.role,
        }))
    }
}

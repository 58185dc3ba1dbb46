//! Login use-case.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use zeroize::Zeroizing;

use crate::domain::ports::{LoginOutcome, LoginService, PasswordHasher, UserRepository};
use crate::domain::session_token::{AuthConfig, SessionIdentity, sign};
use crate::domain::{Error, LoginCredentials};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// [`LoginService`] checking Argon2 hashes and minting session tokens.
#[derive(Clone)]
pub struct AuthService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    config: Arc<AuthConfig>,
    clock: Arc<dyn Clock>,
}

impl<U, H> AuthService<U, H> {
    /// Create the service.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<H>,
        config: Arc<AuthConfig>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            config,
            clock,
        }
    }
}

impl<U, H> AuthService<U, H>
where
    H: PasswordHasher + 'static,
{
    async fn password_matches(&self, password: &str, hash: String) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        let verdict = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|error| {
                tracing::error!(%error, "password verification task failed");
                Error::internal("password verification failed")
            })?;
        verdict.map_err(|error| {
            tracing::error!(%error, "stored password hash unusable");
            Error::internal("password verification failed")
        })
    }
}

#[async_trait]
impl<U, H> LoginService for AuthService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        let Some(record) = self.users.find_credentials(credentials.email()).await? else {
            tracing::info!("login refused: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        if !self
            .password_matches(credentials.password(), record.password_hash)
            .await?
        {
            tracing::info!(user_id = %record.user.id, "login refused: wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let user = record.user;
        if user.is_blocked {
            tracing::info!(user_id = %user.id, "login refused: account blocked");
            return Err(Error::forbidden("account is blocked"));
        }

        let identity = SessionIdentity {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
        };
        let token = sign(&identity, &self.config, self.clock.utc())
            .map_err(|error| Error::internal(format!("failed to issue session: {error}")))?;
        tracing::info!(user_id = %user.id, role = %user.role, "login succeeded");
        Ok(LoginOutcome { user, token })
    }
}

//! Signed, time-bound session tokens.
//!
//! Tokens are HS256 JWTs carrying `{userId, email, role, iat, exp}`. Only this
//! module mints them. Verification is pure: expiry is judged against the
//! `now` supplied by the caller, never the wall clock, so the access gate
//! and tests control time through [`mockable::Clock`].

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{Email, UserId, UserRole};

/// Lifetime of a freshly issued session.
pub const SESSION_TTL_DAYS: i64 = 7;

/// Minimum accepted length of the signing secret in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// HMAC signing secret, wiped from memory on drop.
#[derive(Clone)]
pub struct TokenSecret(Zeroizing<Vec<u8>>);

impl TokenSecret {
    /// Wrap raw secret bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    /// Length of the secret in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(<redacted>)")
    }
}

/// Session signing configuration built once at startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    secret: TokenSecret,
    session_ttl: Duration,
}

impl AuthConfig {
    /// Configuration with the default seven-day session lifetime.
    pub fn new(secret: TokenSecret) -> Self {
        Self {
            secret,
            session_ttl: Duration::days(SESSION_TTL_DAYS),
        }
    }

    /// Override the session lifetime.
    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Signing secret.
    pub fn secret(&self) -> &TokenSecret {
        &self.secret
    }

    /// How long an issued token stays valid.
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }
}

/// Identity carried by a verified session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: UserId,
    pub email: Email,
    pub role: UserRole,
}

/// Opaque encoded session token.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Encoded token as sent in the cookie.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Why a token failed verification.
///
/// Callers treat every variant as "invalid"; the split exists for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Not a JWT, or claims missing or unparseable.
    #[error("session token is malformed")]
    Malformed,
    /// Signature does not match the configured secret.
    #[error("session token signature is invalid")]
    BadSignature,
    /// `now` is at or past the token's expiry.
    #[error("session token has expired")]
    Expired,
    /// The token could not be produced.
    #[error("session token could not be signed")]
    Signing,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: String,
    email: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Mint a token for `identity`, valid from `issued_at` for the configured TTL.
///
/// # Errors
/// Returns [`TokenError::Signing`] if the JWT encoder fails.
pub fn sign(
    identity: &SessionIdentity,
    config: &AuthConfig,
    issued_at: DateTime<Utc>,
) -> Result<SessionToken, TokenError> {
    let claims = Claims {
        user_id: identity.user_id.to_string(),
        email: identity.email.to_string(),
        role: identity.role.as_str().to_owned(),
        iat: issued_at.timestamp(),
        exp: (issued_at + config.session_ttl).timestamp(),
    };
    let key = EncodingKey::from_secret(config.secret.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map(SessionToken)
        .map_err(|error| {
            tracing::error!(%error, "failed to encode session token");
            TokenError::Signing
        })
}

/// Verify `token` against `config` as of `now`.
///
/// # Examples
/// ```
/// use chrono::{Duration, Utc};
/// use rental_admin::domain::session_token::{
///     AuthConfig, SessionIdentity, TokenError, TokenSecret, sign, verify,
/// };
/// use rental_admin::domain::{Email, UserId, UserRole};
///
/// let config = AuthConfig::new(TokenSecret::new(vec![7_u8; 32]));
/// let identity = SessionIdentity {
///     user_id: UserId::random(),
///     email: Email::new("admin@example.com").expect("email"),
///     role: UserRole::Admin,
/// };
/// let issued = Utc::now();
/// let token = sign(&identity, &config, issued).expect("signed");
/// assert_eq!(verify(token.as_str(), &config, issued), Ok(identity));
/// assert_eq!(
///     verify(token.as_str(), &config, issued + Duration::days(7)),
///     Err(TokenError::Expired)
/// );
/// ```
///
/// # Errors
/// Returns a [`TokenError`] describing why the token is not acceptable.
pub fn verify(
    token: &str,
    config: &AuthConfig,
    now: DateTime<Utc>,
) -> Result<SessionIdentity, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is judged against the caller's clock below.
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp"]);

    let key = DecodingKey::from_secret(config.secret.as_bytes());
    let claims = jsonwebtoken::decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|error| match error.kind() {
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        })?;

    if now.timestamp() >= claims.exp {
        return Err(TokenError::Expired);
    }

    Ok(SessionIdentity {
        user_id: UserId::new(&claims.user_id).map_err(|_| TokenError::Malformed)?,
        email: Email::new(&claims.email).map_err(|_| TokenError::Malformed)?,
        role: claims.role.parse().map_err(|_| TokenError::Malformed)?,
    })
}

#[cfg(test)]
mod tests {
    //! Token codec coverage around secrets, expiry edges and payload shape.

    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> AuthConfig {
        AuthConfig::new(TokenSecret::new(b"0123456789abcdef0123456789abcdef".to_vec()))
    }

    #[fixture]
    fn identity() -> SessionIdentity {
        SessionIdentity {
            user_id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("user id"),
            email: Email::new("admin@example.com").expect("email"),
            role: UserRole::Admin,
        }
    }

    #[fixture]
    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    fn verifies_with_same_secret(
        config: AuthConfig,
        identity: SessionIdentity,
        issued_at: DateTime<Utc>,
    ) {
        let token = sign(&identity, &config, issued_at).expect("sign");
        assert_eq!(verify(token.as_str(), &config, issued_at), Ok(identity));
    }

    #[rstest]
    fn rejects_token_signed_with_other_secret(
        config: AuthConfig,
        identity: SessionIdentity,
        issued_at: DateTime<Utc>,
    ) {
        let other = AuthConfig::new(TokenSecret::new(vec![1_u8; 32]));
        let token = sign(&identity, &other, issued_at).expect("sign");
        assert_eq!(
            verify(token.as_str(), &config, issued_at),
            Err(TokenError::BadSignature)
        );
    }

    #[rstest]
    #[case(Duration::days(7) - Duration::seconds(1), true)]
    #[case(Duration::days(7), false)]
    #[case(Duration::days(8), false)]
    fn expiry_boundary_is_exclusive(
        config: AuthConfig,
        identity: SessionIdentity,
        issued_at: DateTime<Utc>,
        #[case] elapsed: Duration,
        #[case] valid: bool,
    ) {
        let token = sign(&identity, &config, issued_at).expect("sign");
        let result = verify(token.as_str(), &config, issued_at + elapsed);
        if valid {
            assert!(result.is_ok(), "expected valid token, got {result:?}");
        } else {
            assert_eq!(result, Err(TokenError::Expired));
        }
    }

    #[rstest]
    #[case("")]
    #[case("not-a-jwt")]
    #[case("a.b.c")]
    fn garbage_is_malformed(config: AuthConfig, issued_at: DateTime<Utc>, #[case] token: &str) {
        assert_eq!(verify(token, &config, issued_at), Err(TokenError::Malformed));
    }

    #[rstest]
    fn tampered_payload_fails_signature(
        config: AuthConfig,
        identity: SessionIdentity,
        issued_at: DateTime<Utc>,
    ) {
        let token = sign(&identity, &config, issued_at).expect("sign");
        let mut parts: Vec<String> = token.as_str().split('.').map(str::to_owned).collect();
        let forged = SessionIdentity {
            role: UserRole::User,
            ..identity
        };
        let forged_token = sign(&forged, &config, issued_at).expect("sign forged");
        let forged_payload = forged_token
            .as_str()
            .split('.')
            .nth(1)
            .expect("payload segment")
            .to_owned();
        parts[1] = forged_payload;
        let spliced = parts.join(".");
        assert_eq!(
            verify(&spliced, &config, issued_at),
            Err(TokenError::BadSignature)
        );
    }

    #[rstest]
    fn ttl_override_is_honoured(identity: SessionIdentity, issued_at: DateTime<Utc>) {
        let config = config().with_session_ttl(Duration::minutes(5));
        let token = sign(&identity, &config, issued_at).expect("sign");
        assert!(verify(token.as_str(), &config, issued_at + Duration::minutes(4)).is_ok());
        assert_eq!(
            verify(token.as_str(), &config, issued_at + Duration::minutes(5)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let secret = TokenSecret::new(b"super-secret".to_vec());
        assert_eq!(format!("{secret:?}"), "TokenSecret(<redacted>)");
    }
}

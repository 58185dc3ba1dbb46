//! Process configuration loaded through OrthoConfig.
//!
//! Values come from `RENTAL_ADMIN_*` environment variables, configuration
//! files and command-line flags, in OrthoConfig's usual precedence.
//! [`AppSettings::into_server_config`] validates them for the build mode.

use std::net::SocketAddr;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use rand::RngCore;
use serde::Deserialize;
use tracing::warn;

use rental_admin::domain::session_token::{AuthConfig, MIN_SECRET_LEN, TokenSecret};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Build mode controlling how strictly settings are validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing secrets are replaced with ephemeral ones.
    Debug,
    /// Every secret must be supplied.
    Release,
}

impl BuildMode {
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Raw settings as loaded.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RENTAL_ADMIN")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// HS256 signing secret for session tokens.
    pub jwt_secret: Option<String>,
    /// Listen address; defaults to `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
    /// Mark the session cookie `Secure`; defaults to true.
    pub cookie_secure: Option<bool>,
    /// Pool size; defaults to 10.
    pub db_max_connections: Option<u32>,
}

/// Validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting: {name}")]
    Missing { name: &'static str },
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("jwt_secret too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
    #[error("db_max_connections must be at least 1")]
    EmptyPool,
}

/// Validated settings handed to the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub db_max_connections: u32,
    pub cookie_secure: bool,
    pub auth: Arc<AuthConfig>,
}

impl AppSettings {
    /// Validate and fill defaults.
    pub fn into_server_config(self, mode: BuildMode) -> Result<ServerConfig, ConfigError> {
        let database_url = self.database_url.ok_or(ConfigError::Missing {
            name: "database_url",
        })?;
        let raw_addr = self
            .bind_addr
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = raw_addr
            .parse()
            .map_err(|source| ConfigError::BindAddr {
                value: raw_addr.clone(),
                source,
            })?;
        let db_max_connections = self.db_max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS);
        if db_max_connections == 0 {
            return Err(ConfigError::EmptyPool);
        }
        let secret = token_secret(self.jwt_secret, mode)?;

        Ok(ServerConfig {
            bind_addr,
            database_url,
            db_max_connections,
            cookie_secure: self.cookie_secure.unwrap_or(true),
            auth: Arc::new(AuthConfig::new(secret)),
        })
    }
}

fn token_secret(raw: Option<String>, mode: BuildMode) -> Result<TokenSecret, ConfigError> {
    match (raw, mode) {
        (Some(secret), _) if secret.len() >= MIN_SECRET_LEN => {
            Ok(TokenSecret::new(secret.into_bytes()))
        }
        (Some(secret), BuildMode::Release) => Err(ConfigError::SecretTooShort {
            length: secret.len(),
            min_len: MIN_SECRET_LEN,
        }),
        (Some(secret), BuildMode::Debug) => {
            warn!(
                length = secret.len(),
                min_len = MIN_SECRET_LEN,
                "jwt_secret shorter than recommended; accepted in debug builds only"
            );
            Ok(TokenSecret::new(secret.into_bytes()))
        }
        (None, BuildMode::Release) => Err(ConfigError::Missing { name: "jwt_secret" }),
        (None, BuildMode::Debug) => {
            warn!("jwt_secret not set; using an ephemeral secret, sessions end on restart");
            let mut bytes = vec![0_u8; MIN_SECRET_LEN];
            rand::thread_rng().fill_bytes(&mut bytes);
            Ok(TokenSecret::new(bytes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "RENTAL_ADMIN_DATABASE_URL",
        "RENTAL_ADMIN_JWT_SECRET",
        "RENTAL_ADMIN_BIND_ADDR",
        "RENTAL_ADMIN_COOKIE_SECURE",
        "RENTAL_ADMIN_DB_MAX_CONNECTIONS",
    ];

    fn load(values: [Option<&str>; 5]) -> AppSettings {
        let _guard = lock_env(
            VARS.iter()
                .zip(values)
                .map(|(name, value)| (*name, value.map(str::to_owned)))
                .collect::<Vec<_>>(),
        );
        AppSettings::load_from_iter([OsString::from("rental-admin")]).expect("settings load")
    }

    fn settings(secret: Option<&str>) -> AppSettings {
        AppSettings {
            database_url: Some("postgres://localhost/rentals".to_owned()),
            jwt_secret: secret.map(str::to_owned),
            bind_addr: None,
            cookie_secure: None,
            db_max_connections: None,
        }
    }

    const LONG_SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[rstest]
    fn environment_is_read() {
        let loaded = load([
            Some("postgres://db/rentals"),
            Some(LONG_SECRET),
            Some("127.0.0.1:9000"),
            Some("false"),
            Some("4"),
        ]);
        assert_eq!(loaded.database_url.as_deref(), Some("postgres://db/rentals"));
        assert_eq!(loaded.bind_addr.as_deref(), Some("127.0.0.1:9000"));
        assert_eq!(loaded.cookie_secure, Some(false));
        assert_eq!(loaded.db_max_connections, Some(4));
    }

    #[rstest]
    fn defaults_fill_in() {
        let loaded = load([Some("postgres://db/rentals"), None, None, None, None]);
        let config = loaded
            .into_server_config(BuildMode::Debug)
            .expect("debug config");
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().expect("addr"));
        assert!(config.cookie_secure);
        assert_eq!(config.db_max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.auth.secret().len(), MIN_SECRET_LEN);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("short"))]
    fn release_requires_a_strong_secret(#[case] secret: Option<&str>) {
        assert!(settings(secret).into_server_config(BuildMode::Release).is_err());
    }

    #[rstest]
    fn release_accepts_a_strong_secret() {
        let config = settings(Some(LONG_SECRET))
            .into_server_config(BuildMode::Release)
            .expect("release config");
        assert_eq!(config.auth.secret().len(), LONG_SECRET.len());
    }

    #[rstest]
    fn missing_database_url_is_reported() {
        let mut raw = settings(Some(LONG_SECRET));
        raw.database_url = None;
        let err = raw
            .into_server_config(BuildMode::Debug)
            .expect_err("missing url");
        assert!(matches!(err, ConfigError::Missing { name: "database_url" }));
    }

    #[rstest]
    #[case(Some("not an address".to_owned()), None)]
    #[case(None, Some(0))]
    fn malformed_values_are_rejected(
        #[case] bind_addr: Option<String>,
        #[case] pool: Option<u32>,
    ) {
        let mut raw = settings(Some(LONG_SECRET));
        raw.bind_addr = bind_addr;
        raw.db_max_connections = pool;
        assert!(raw.into_server_config(BuildMode::Debug).is_err());
    }
}

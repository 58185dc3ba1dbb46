//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BookingsCommand, BookingsQuery, ListingsCommand, ListingsQuery, LoginService, SessionGate,
    UsersCommand, UsersQuery,
};
use crate::inbound::http::session::SessionCookieConfig;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub gate: Arc<dyn SessionGate>,
    pub users_query: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub listings_query: Arc<dyn ListingsQuery>,
    pub listings_command: Arc<dyn ListingsCommand>,
    pub bookings_query: Arc<dyn BookingsQuery>,
    pub bookings_command: Arc<dyn BookingsCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub gate: Arc<dyn SessionGate>,
    pub users_query: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub listings_query: Arc<dyn ListingsQuery>,
    pub listings_command: Arc<dyn ListingsCommand>,
    pub bookings_query: Arc<dyn BookingsQuery>,
    pub bookings_command: Arc<dyn BookingsCommand>,
    pub session_cookie: SessionCookieConfig,
}

impl HttpState {
    /// Construct state from the ports bundle and cookie attributes.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use rental_admin::domain::session_token::{AuthConfig, TokenSecret};
    /// use rental_admin::domain::{
    ///     AccessGate, AuthService, BookingService, ListingService, UserAdminService,
    /// };
    /// use rental_admin::inbound::http::session::SessionCookieConfig;
    /// use rental_admin::inbound::http::state::{HttpState, HttpStatePorts};
    /// use rental_admin::outbound::security::Argon2PasswordHasher;
    /// use rental_admin::test_support::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let config = Arc::new(AuthConfig::new(TokenSecret::new([7_u8; 32])));
    /// let clock = Arc::new(mockable::DefaultClock);
    /// let ports = HttpStatePorts {
    ///     login: Arc::new(AuthService::new(
    ///         store.clone(),
    ///         Arc::new(Argon2PasswordHasher::default()),
    ///         config.clone(),
    ///         clock.clone(),
    ///     )),
    ///     gate: Arc::new(AccessGate::new(store.clone(), config.clone(), clock)),
    ///     users_query: Arc::new(UserAdminService::new(store.clone())),
    ///     users_command: Arc::new(UserAdminService::new(store.clone())),
    ///     listings_query: Arc::new(ListingService::new(store.clone(), store.clone())),
    ///     listings_command: Arc::new(ListingService::new(store.clone(), store.clone())),
    ///     bookings_query: Arc::new(BookingService::new(store.clone(), store.clone(), store.clone())),
    ///     bookings_command: Arc::new(BookingService::new(store.clone(), store.clone(), store)),
    /// };
    /// let state = HttpState::new(ports, SessionCookieConfig::new(false, config.session_ttl()));
    /// let _gate = state.gate.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, session_cookie: SessionCookieConfig) -> Self {
        let HttpStatePorts {
            login,
            gate,
            users_query,
            users_command,
            listings_query,
            listings_command,
            bookings_query,
            bookings_command,
        } = ports;
        Self {
            login,
            gate,
            users_query,
            users_command,
            listings_query,
            listings_command,
            bookings_query,
            bookings_command,
            session_cookie,
        }
    }
}

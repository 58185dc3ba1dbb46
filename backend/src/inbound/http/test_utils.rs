//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::User;
use crate::domain::ports::{
    AccessDecision, MockBookingsCommand, MockBookingsQuery, MockListingsCommand,
    MockListingsQuery, MockLoginService, MockSessionGate, MockUsersCommand, MockUsersQuery,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::session::{AUTH_COOKIE, SessionCookieConfig};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::test_support::fixtures;

/// Mocked driving ports; unset expectations panic when called.
#[derive(Default)]
pub struct TestPorts {
    pub login: MockLoginService,
    pub gate: MockSessionGate,
    pub users_query: MockUsersQuery,
    pub users_command: MockUsersCommand,
    pub listings_query: MockListingsQuery,
    pub listings_command: MockListingsCommand,
    pub bookings_query: MockBookingsQuery,
    pub bookings_command: MockBookingsCommand,
}

impl TestPorts {
    /// Ports whose gate admits `user` on every request.
    pub fn signed_in_as(user: &User) -> Self {
        Self {
            gate: gate_admitting(user),
            ..Self::default()
        }
    }

    pub fn into_state(self) -> HttpState {
        HttpState::new(
            HttpStatePorts {
                login: Arc::new(self.login),
                gate: Arc::new(self.gate),
                users_query: Arc::new(self.users_query),
                users_command: Arc::new(self.users_command),
                listings_query: Arc::new(self.listings_query),
                listings_command: Arc::new(self.listings_command),
                bookings_query: Arc::new(self.bookings_query),
                bookings_command: Arc::new(self.bookings_command),
            },
            SessionCookieConfig::new(false, chrono::Duration::days(7)),
        )
    }
}

/// Gate that admits `user` for any number of requests.
pub fn gate_admitting(user: &User) -> MockSessionGate {
    let identity = fixtures::identity(user);
    let mut gate = MockSessionGate::new();
    gate.expect_authorize()
        .returning(move |_| Ok(AccessDecision::Allow(identity.clone())));
    gate
}

/// Cookie accepted by [`gate_admitting`]; its value is never verified.
pub fn session_cookie() -> Cookie<'static> {
    Cookie::new(AUTH_COOKIE, "test-session")
}

/// App exposing the full `/api/v1` surface over `ports`.
pub fn test_app(
    ports: TestPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .service(web::scope("/api/v1").configure(configure_api))
}

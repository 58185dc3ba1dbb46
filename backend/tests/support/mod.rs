//! In-memory application harness shared by the HTTP integration suites.
//!
//! Wires the real domain services over [`InMemoryStore`] with a hand-driven
//! clock, then mounts the full `/api/v1` surface behind the trace middleware.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use mockable::Clock;
use rental_admin::Trace;
use rental_admin::domain::session_token::AuthConfig;
use rental_admin::domain::{
    AccessGate, AuthService, BookingService, Listing, ListingService, User, UserAdminService,
};
use rental_admin::inbound::http::configure_api;
use rental_admin::inbound::http::session::{AUTH_COOKIE, SessionCookieConfig};
use rental_admin::inbound::http::state::{HttpState, HttpStatePorts};
use rental_admin::test_support::fixtures::{self, epoch};
use rental_admin::test_support::{InMemoryStore, MutableClock, PlainTextHasher};
use serde_json::{Value, json};

/// Password every seeded account signs in with.
pub const PASSWORD: &str = "password1";

/// Store, clock and signing configuration behind one app instance.
pub struct World {
    pub store: InMemoryStore,
    pub clock: Arc<MutableClock>,
    pub auth: Arc<AuthConfig>,
}

impl World {
    pub fn new() -> Self {
        let clock = Arc::new(MutableClock::new(epoch()));
        let store = InMemoryStore::new(clock.clone());
        Self {
            store,
            clock,
            auth: Arc::new(fixtures::auth_config()),
        }
    }

    /// Store `user` with [`PASSWORD`] and hand it back.
    pub fn seed_user(&self, user: User) -> User {
        self.store
            .insert_user(user.clone(), format!("plain${PASSWORD}"));
        user
    }

    /// Store `listing` and hand it back.
    pub fn seed_listing(&self, listing: Listing) -> Listing {
        self.store.insert_listing(listing.clone());
        listing
    }

    fn state(&self) -> HttpState {
        let users = Arc::new(self.store.clone());
        let listings = Arc::new(self.store.clone());
        let bookings = Arc::new(self.store.clone());
        let clock: Arc<dyn Clock> = self.clock.clone();

        let user_admin = Arc::new(UserAdminService::new(users.clone()));
        let listing_service = Arc::new(ListingService::new(listings.clone(), users.clone()));
        let booking_service = Arc::new(BookingService::new(bookings, listings, users.clone()));

        HttpState::new(
            HttpStatePorts {
                login: Arc::new(AuthService::new(
                    users.clone(),
                    Arc::new(PlainTextHasher),
                    self.auth.clone(),
                    clock.clone(),
                )),
                gate: Arc::new(AccessGate::new(users, self.auth.clone(), clock)),
                users_query: user_admin.clone(),
                users_command: user_admin,
                listings_query: listing_service.clone(),
                listings_command: listing_service,
                bookings_query: booking_service.clone(),
                bookings_command: booking_service,
            },
            SessionCookieConfig::new(false, self.auth.session_ttl()),
        )
    }
}

/// Full `/api/v1` application over `world`.
pub async fn init_app(
    world: &World,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .wrap(Trace)
            .app_data(web::Data::new(world.state()))
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await
}

/// Status and JSON body of a request; an empty body reads as `null`.
pub async fn send<S>(app: &S, request: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

/// Sign in as `email` and return the issued session cookie.
pub async fn login<S>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": email, "password": PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login as {email}");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == AUTH_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie")
}

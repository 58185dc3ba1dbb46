//! Wire domain services over a set of repositories into [`HttpState`].

use std::sync::Arc;

use mockable::Clock;

use rental_admin::domain::ports::{
    BookingRepository, ListingRepository, PasswordHasher, UserRepository,
};
use rental_admin::domain::session_token::AuthConfig;
use rental_admin::domain::{
    AccessGate, AuthService, BookingService, ListingService, UserAdminService,
};
use rental_admin::inbound::http::session::SessionCookieConfig;
use rental_admin::inbound::http::state::{HttpState, HttpStatePorts};

/// Repositories and collaborators the services are built from.
pub struct Repositories<U, L, B, H> {
    pub users: Arc<U>,
    pub listings: Arc<L>,
    pub bookings: Arc<B>,
    pub hasher: Arc<H>,
}

/// Build every driving port and bundle them with the cookie attributes.
pub fn build_http_state<U, L, B, H>(
    repos: Repositories<U, L, B, H>,
    auth: Arc<AuthConfig>,
    clock: Arc<dyn Clock>,
    cookie_secure: bool,
) -> HttpState
where
    U: UserRepository + 'static,
    L: ListingRepository + 'static,
    B: BookingRepository + 'static,
    H: PasswordHasher + 'static,
{
    let Repositories {
        users,
        listings,
        bookings,
        hasher,
    } = repos;

    let user_admin = Arc::new(UserAdminService::new(users.clone()));
    let listing_service = Arc::new(ListingService::new(listings.clone(), users.clone()));
    let booking_service = Arc::new(BookingService::new(bookings, listings, users.clone()));

    let ports = HttpStatePorts {
        login: Arc::new(AuthService::new(
            users.clone(),
            hasher,
            auth.clone(),
            clock.clone(),
        )),
        gate: Arc::new(AccessGate::new(users, auth.clone(), clock)),
        users_query: user_admin.clone(),
        users_command: user_admin,
        listings_query: listing_service.clone(),
        listings_command: listing_service,
        bookings_query: booking_service.clone(),
        bookings_command: booking_service,
    };

    HttpState::new(
        ports,
        SessionCookieConfig::new(cookie_secure, auth.session_ttl()),
    )
}

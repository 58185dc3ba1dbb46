//! OpenAPI document for the admin API.
//!
//! Served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary. Domain types stay free of utoipa; the HTTP adapter's DTOs and
//! [`ErrorSchema`] carry the schema derives.

use crate::inbound::http::session::AUTH_COOKIE;
use crate::inbound::http::bookings::{CreateBookingBody, UpdateBookingStatusBody};
use crate::inbound::http::dto::{
    BookingBody, BookingViewBody, ListingBody, ListingDetailBody, ListingViewBody,
    PaginationBody, SessionEnvelope, SuccessBody, UserBody, UserDetailBody, UserSummaryBody,
};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::listings::ListingRequest;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::UpdateUserRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                AUTH_COOKIE,
                "Signed session token issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Rental admin API",
        description = "Administration of users, listings and bookings for a short-stay rental platform."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::listings::list_listings,
        crate::inbound::http::listings::create_listing,
        crate::inbound::http::listings::get_listing,
        crate::inbound::http::listings::update_listing,
        crate::inbound::http::listings::delete_listing,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::bookings::list_bookings,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::get_booking,
        crate::inbound::http::bookings::update_booking_status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        PaginationBody,
        LoginRequest,
        SessionEnvelope,
        UserBody,
        UserSummaryBody,
        UserDetailBody,
        UpdateUserRequest,
        ListingRequest,
        ListingBody,
        ListingViewBody,
        ListingDetailBody,
        SuccessBody,
        CreateBookingBody,
        UpdateBookingStatusBody,
        BookingBody,
        BookingViewBody,
    )),
    tags(
        (name = "auth", description = "Sign-in and session introspection"),
        (name = "listings", description = "Rental listings"),
        (name = "users", description = "Platform accounts"),
        (name = "bookings", description = "Stays booked against listings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

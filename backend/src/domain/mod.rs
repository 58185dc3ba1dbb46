//! Domain primitives, lifecycle rules and use-case services.
//!
//! Purpose: define strongly typed entities shared by the HTTP and
//! persistence adapters, the rules guarding every mutation, and the services
//! implementing the driving ports.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: API error payload and its stable codes.
//! - [`User`], [`Listing`], [`Booking`] and their read models.
//! - [`lifecycle`]: the rule engine.
//! - [`session_token`]: signing and verifying session tokens.
//! - [`ports`]: the hexagon's edges.

pub mod access;
pub mod auth;
pub mod auth_service;
pub mod booking;
pub mod booking_service;
pub mod error;
pub mod id;
pub mod lifecycle;
pub mod listing;
pub mod listing_service;
pub mod money;
pub mod ports;
pub mod session_token;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::access::AccessGate;
pub use self::auth::{LoginCredentials, LoginValidationError, PASSWORD_MIN_LEN};
pub use self::auth_service::AuthService;
pub use self::booking::{
    Booking, BookingFilter, BookingId, BookingListingExcerpt, BookingStatus, BookingView,
    NewBooking,
};
pub use self::booking_service::BookingService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::id::InvalidId;
pub use self::listing::{
    Listing, ListingBookingExcerpt, ListingChanges, ListingDetail, ListingDraft, ListingFilter,
    ListingId, ListingStatus, ListingValidationError, ListingView, NewListing,
};
pub use self::listing_service::ListingService;
pub use self::money::{Money, MoneyError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DisplayName, Email, GuestBookingExcerpt, HostedListingExcerpt, UnknownVariant, User,
    UserChanges, UserDetail, UserId, UserRef, UserRole, UserSummary, UserValidationError,
};
pub use self::user_service::UserAdminService;

/// How many recent listings or bookings detail views embed.
pub const RECENT_ACTIVITY_LIMIT: u32 = 10;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use rental_admin::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

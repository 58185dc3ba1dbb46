//! Ready-made domain values for tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::session_token::{AuthConfig, SessionIdentity, TokenSecret};
use crate::domain::{
    Booking, BookingId, BookingStatus, DisplayName, Email, Listing, ListingId, ListingStatus,
    Money, User, UserId, UserRole,
};

/// Secret shared by fixtures that sign tokens.
pub const TEST_SECRET: &[u8; 32] = b"test-secret-test-secret-test-sec";

/// Fixed instant most fixtures are stamped with: 2025-01-01T00:00:00Z.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("fixture epoch must be a valid timestamp"))
}

/// Midnight UTC on the given day of 2025.
pub fn day(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid fixture date 2025-{month}-{day}"))
}

/// Token configuration using [`TEST_SECRET`].
pub fn auth_config() -> AuthConfig {
    AuthConfig::new(TokenSecret::new(TEST_SECRET.to_vec()))
}

/// A user with the given role and a name derived from `local_part`.
pub fn user(local_part: &str, role: UserRole) -> User {
    let email = Email::new(format!("{local_part}@example.com"))
        .unwrap_or_else(|err| panic!("fixture email for {local_part}: {err}"));
    let name = DisplayName::new(format!("{local_part} fixture"))
        .unwrap_or_else(|err| panic!("fixture name for {local_part}: {err}"));
    User {
        id: UserId::random(),
        email,
        name,
        role,
        is_blocked: false,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

/// An administrator.
pub fn admin() -> User {
    user("admin", UserRole::Admin)
}

/// A regular user.
pub fn guest() -> User {
    user("guest", UserRole::User)
}

/// Session identity for `user`.
pub fn identity(user: &User) -> SessionIdentity {
    SessionIdentity {
        user_id: user.id,
        email: user.email.clone(),
        role: user.role,
    }
}

/// An active listing for four guests at 150.00 a night.
pub fn listing(host_id: UserId) -> Listing {
    Listing {
        id: ListingId::random(),
        title: "Harbour loft".to_owned(),
        description: "Bright loft overlooking the harbour".to_owned(),
        location: "Lisbon".to_owned(),
        price_per_night: Money::from_cents(15_000),
        max_guests: 4,
        bedrooms: 2,
        bathrooms: 1,
        image_url: None,
        status: ListingStatus::Active,
        host_id,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

/// A three-night booking of `listing` by `user_id` in the given status.
pub fn booking(listing: &Listing, user_id: UserId, status: BookingStatus) -> Booking {
    Booking {
        id: BookingId::random(),
        check_in: day(3, 1),
        check_out: day(3, 4),
        total_price: Money::from_cents(45_000),
        guests: 2,
        status,
        user_id,
        listing_id: listing.id,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

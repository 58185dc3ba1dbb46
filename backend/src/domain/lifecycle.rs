//! Lifecycle rules guarding every listing, booking and user mutation.
//!
//! Each rule is a pure function over the closed status enums. Services call
//! the relevant rule immediately before asking the repository to mutate; a
//! [`RuleViolation`] short-circuits the request with nothing persisted.
//!
//! | Entity  | Rule                                                        |
//! |---------|-------------------------------------------------------------|
//! | Listing | any status may move to any other; archiving is idempotent   |
//! | Booking | `COMPLETED` and `CANCELLED` are terminal                    |
//! | User    | an `ADMIN` account can never be blocked                     |
//! | Booking | creation checks dates, guest capacity, then computed price  |

use chrono::{DateTime, Utc};
use serde_json::json;

use super::{BookingStatus, Error, ListingStatus, Money, UserRole};

const SECONDS_PER_NIGHT: u64 = 86_400;

/// Reasons a lifecycle rule refuses a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    /// The booking already reached a terminal status.
    #[error("cannot update completed or cancelled bookings")]
    TerminalState { current: BookingStatus },
    /// Blocking was requested for an administrator.
    #[error("cannot block admin users")]
    CannotBlockAdmin,
    /// Check-out is not strictly after check-in.
    #[error("check-out must be after check-in")]
    InvalidDateRange,
    /// More guests than the listing accommodates.
    #[error("guest count {requested} exceeds listing capacity of {max}")]
    GuestCountExceeded { requested: u32, max: u32 },
    /// The computed total is not a positive amount.
    #[error("total price must be positive")]
    InvalidPrice,
}

impl RuleViolation {
    /// Stable machine-readable rule code carried in error details.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TerminalState { .. } => "terminal_state",
            Self::CannotBlockAdmin => "cannot_block_admin",
            Self::InvalidDateRange => "invalid_date_range",
            Self::GuestCountExceeded { .. } => "guest_count_exceeded",
            Self::InvalidPrice => "invalid_price",
        }
    }
}

impl From<RuleViolation> for Error {
    fn from(violation: RuleViolation) -> Self {
        let details = match violation {
            RuleViolation::TerminalState { current } => {
                json!({ "code": violation.code(), "currentStatus": current })
            }
            RuleViolation::GuestCountExceeded { requested, max } => {
                json!({ "code": violation.code(), "requested": requested, "maxGuests": max })
            }
            RuleViolation::CannotBlockAdmin
            | RuleViolation::InvalidDateRange
            | RuleViolation::InvalidPrice => json!({ "code": violation.code() }),
        };
        Self::business_rule(violation.to_string()).with_details(details)
    }
}

/// Listings have no terminal states, so every transition is allowed.
pub const fn can_transition_listing(
    current: ListingStatus,
    requested: ListingStatus,
) -> Result<(), RuleViolation> {
    match (current, requested) {
        (
            ListingStatus::Active | ListingStatus::Inactive | ListingStatus::Archived,
            ListingStatus::Active | ListingStatus::Inactive | ListingStatus::Archived,
        ) => Ok(()),
    }
}

/// Status a listing ends in after a delete request.
///
/// Always [`ListingStatus::Archived`]; archiving an archived listing is a
/// no-op rather than an error.
pub const fn archive(current: ListingStatus) -> ListingStatus {
    match current {
        ListingStatus::Active | ListingStatus::Inactive | ListingStatus::Archived => {
            ListingStatus::Archived
        }
    }
}

/// Refuse any change once a booking is completed or cancelled.
///
/// The requested status is irrelevant: even re-asserting the current
/// terminal status is refused.
///
/// # Examples
/// ```
/// use rental_admin::domain::BookingStatus;
/// use rental_admin::domain::lifecycle::{RuleViolation, can_transition_booking};
///
/// assert!(can_transition_booking(BookingStatus::Pending, BookingStatus::Confirmed).is_ok());
/// assert_eq!(
///     can_transition_booking(BookingStatus::Completed, BookingStatus::Pending),
///     Err(RuleViolation::TerminalState { current: BookingStatus::Completed })
/// );
/// ```
pub const fn can_transition_booking(
    current: BookingStatus,
    _requested: BookingStatus,
) -> Result<(), RuleViolation> {
    match current {
        BookingStatus::Completed | BookingStatus::Cancelled => {
            Err(RuleViolation::TerminalState { current })
        }
        BookingStatus::Pending | BookingStatus::Confirmed => Ok(()),
    }
}

/// Refuse to block an administrator.
///
/// Only an explicit `Some(true)` is checked; renaming an admin or explicitly
/// unblocking one is fine.
pub const fn can_apply_user_update(
    existing_role: UserRole,
    requested_blocked: Option<bool>,
) -> Result<(), RuleViolation> {
    match (existing_role, requested_blocked) {
        (UserRole::Admin, Some(true)) => Err(RuleViolation::CannotBlockAdmin),
        (UserRole::Admin, Some(false) | None) | (UserRole::User, _) => Ok(()),
    }
}

/// Accepted booking request with its derived price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingQuote {
    /// Nights charged, rounding any partial night up.
    pub nights: u32,
    /// `nightly × nights`.
    pub total_price: Money,
}

/// Booking creation request as seen by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRequest {
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub guests: u32,
}

/// Listing facts the creation rules depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingTerms {
    pub max_guests: u32,
    pub price_per_night: Money,
}

/// Validate a new booking and price it.
///
/// Checks run in a fixed order and the first failure wins:
/// date range, then guest capacity, then the computed total.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use rental_admin::domain::Money;
/// use rental_admin::domain::lifecycle::{BookingRequest, ListingTerms, quote_booking};
///
/// let quote = quote_booking(
///     BookingRequest {
///         check_in: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
///         check_out: Utc.with_ymd_and_hms(2025, 1, 4, 0, 0, 0).unwrap(),
///         guests: 2,
///     },
///     ListingTerms { max_guests: 4, price_per_night: Money::from_cents(15_000) },
/// )
/// .expect("valid booking");
/// assert_eq!(quote.nights, 3);
/// assert_eq!(quote.total_price, Money::from_cents(45_000));
/// ```
pub fn quote_booking(
    request: BookingRequest,
    terms: ListingTerms,
) -> Result<BookingQuote, RuleViolation> {
    if request.check_out <= request.check_in {
        return Err(RuleViolation::InvalidDateRange);
    }
    if request.guests > terms.max_guests {
        return Err(RuleViolation::GuestCountExceeded {
            requested: request.guests,
            max: terms.max_guests,
        });
    }
    let nights = nights_between(request.check_in, request.check_out)
        .ok_or(RuleViolation::InvalidPrice)?;
    let total_price = terms
        .price_per_night
        .checked_mul(nights)
        .filter(|total| total.is_positive())
        .ok_or(RuleViolation::InvalidPrice)?;
    Ok(BookingQuote {
        nights,
        total_price,
    })
}

fn nights_between(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> Option<u32> {
    let seconds = u64::try_from((check_out - check_in).num_seconds()).ok()?;
    u32::try_from(seconds.div_ceil(SECONDS_PER_NIGHT)).ok()
}

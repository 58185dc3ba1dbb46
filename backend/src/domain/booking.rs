//! Booking data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::define_id;
use super::user::UnknownVariant;
use super::{ListingId, ListingStatus, Money, UserId, UserRef};

define_id!(
    /// Stable booking identifier.
    BookingId,
    "booking id"
);

/// Booking lifecycle state.
///
/// `Completed` and `Cancelled` are terminal: once reached the status never
/// changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Created and awaiting confirmation.
    #[default]
    Pending,
    /// Accepted by the host.
    Confirmed,
    /// Withdrawn; terminal.
    Cancelled,
    /// Stay finished; terminal.
    Completed,
}

impl BookingStatus {
    /// Stable storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        }
    }

    /// Whether no further transition is allowed.
    pub const fn is_terminal(self) -> bool {
        match self {
            Self::Completed | Self::Cancelled => true,
            Self::Pending | Self::Confirmed => false,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "CANCELLED" => Ok(Self::Cancelled),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(UnknownVariant::new("booking status", other)),
        }
    }
}

/// Booking as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: BookingId,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub total_price: Money,
    pub guests: u32,
    pub status: BookingStatus,
    pub user_id: UserId,
    pub listing_id: ListingId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload produced after creation rules accept a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub total_price: Money,
    pub guests: u32,
    pub user_id: UserId,
    pub listing_id: ListingId,
}

/// Filters accepted by the bookings index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub user_id: Option<UserId>,
    pub listing_id: Option<ListingId>,
}

/// Listing excerpt embedded in booking views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingListingExcerpt {
    pub id: ListingId,
    pub title: String,
    pub location: String,
    pub price_per_night: Money,
    pub max_guests: u32,
    pub status: ListingStatus,
}

/// Booking with its guest and listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingView {
    pub booking: Booking,
    pub guest: UserRef,
    pub listing: BookingListingExcerpt,
}

//! Driving port for creating bookings and moving them through their lifecycle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::session_token::SessionIdentity;
use crate::domain::{Booking, BookingId, BookingStatus, Error, ListingId, UserId};

/// Request to book a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBookingRequest {
    pub listing_id: ListingId,
    /// Explicit guest; the caller is the guest when absent.
    pub user_id: Option<UserId>,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub guests: u32,
    /// Authenticated caller.
    pub actor: SessionIdentity,
}

/// Write side of booking administration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingsCommand: Send + Sync {
    /// Validate, price and store a `PENDING` booking.
    async fn create(&self, request: CreateBookingRequest) -> Result<Booking, Error>;

    /// Change the status unless the booking is already terminal.
    async fn update_status(&self, id: &BookingId, status: BookingStatus)
    -> Result<Booking, Error>;
}

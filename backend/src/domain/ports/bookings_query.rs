//! Driving port for reading bookings.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{BookingFilter, BookingId, BookingView, Error};

/// Read side of booking administration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingsQuery: Send + Sync {
    /// Page through bookings matching `filter`.
    async fn list(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Page<BookingView>, Error>;

    /// Fetch a booking with guest and listing; `not_found` if absent.
    async fn detail(&self, id: &BookingId) -> Result<BookingView, Error>;
}

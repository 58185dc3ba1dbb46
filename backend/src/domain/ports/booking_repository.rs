//! Driven port for booking persistence.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, Booking, BookingFilter, BookingId, BookingStatus, BookingView, NewBooking};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by booking repository adapters.
    pub enum BookingPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "booking repository query failed: {message}",
    }
}

impl From<BookingPersistenceError> for Error {
    fn from(error: BookingPersistenceError) -> Self {
        match error {
            BookingPersistenceError::Connection { message } => {
                Self::service_unavailable(format!("booking repository unavailable: {message}"))
            }
            BookingPersistenceError::Query { message } => {
                Self::internal(format!("booking repository error: {message}"))
            }
        }
    }
}

/// Booking storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Page through bookings matching `filter`, newest first.
    async fn list(
        &self,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> Result<Page<BookingView>, BookingPersistenceError>;

    /// Fetch a booking with guest and listing.
    async fn find_by_id(&self, id: &BookingId)
    -> Result<Option<BookingView>, BookingPersistenceError>;

    /// Insert a booking in `PENDING` status.
    async fn create(&self, booking: &NewBooking) -> Result<Booking, BookingPersistenceError>;

    /// Set the status, returning the updated booking or `None` when absent.
    async fn update_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingPersistenceError>;
}

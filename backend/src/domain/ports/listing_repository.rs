//! Driven port for listing persistence.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, 
    Listing, ListingChanges, ListingDetail, ListingFilter, ListingId, ListingView, NewListing,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by listing repository adapters.
    pub enum ListingPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "listing repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "listing repository query failed: {message}",
    }
}

impl From<ListingPersistenceError> for Error {
    fn from(error: ListingPersistenceError) -> Self {
        match error {
            ListingPersistenceError::Connection { message } => {
                Self::service_unavailable(format!("listing repository unavailable: {message}"))
            }
            ListingPersistenceError::Query { message } => {
                Self::internal(format!("listing repository error: {message}"))
            }
        }
    }
}

/// Listing storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Page through listings matching `filter`, newest first.
    async fn list(
        &self,
        filter: &ListingFilter,
        page: PageRequest,
    ) -> Result<Page<ListingView>, ListingPersistenceError>;

    /// Fetch a bare listing.
    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingPersistenceError>;

    /// Fetch a listing with its host and up to `recent` newest bookings.
    async fn detail(
        &self,
        id: &ListingId,
        recent: u32,
    ) -> Result<Option<ListingDetail>, ListingPersistenceError>;

    /// Insert a listing.
    async fn create(&self, listing: &NewListing) -> Result<Listing, ListingPersistenceError>;

    /// Apply `changes`, returning the updated listing or `None` when absent.
    async fn update(
        &self,
        id: &ListingId,
        changes: &ListingChanges,
    ) -> Result<Option<Listing>, ListingPersistenceError>;
}

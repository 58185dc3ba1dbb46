//! Driving port for reading listings.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, ListingDetail, ListingFilter, ListingId, ListingView};

/// Read side of listing administration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingsQuery: Send + Sync {
    /// Page through listings matching `filter`.
    async fn list(
        &self,
        filter: ListingFilter,
        page: PageRequest,
    ) -> Result<Page<ListingView>, Error>;

    /// Fetch a listing with host and recent bookings; `not_found` if absent.
    async fn detail(&self, id: &ListingId) -> Result<ListingDetail, Error>;
}

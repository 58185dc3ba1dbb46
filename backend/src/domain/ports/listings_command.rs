//! Driving port for changing listings.

use async_trait::async_trait;

use crate::domain::session_token::SessionIdentity;
use crate::domain::{Error, Listing, ListingChanges, ListingDraft, ListingId, UserId};

/// Request to create a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateListingRequest {
    /// Validated listing fields.
    pub draft: ListingDraft,
    /// Explicit host; the caller hosts the listing when absent.
    pub host_id: Option<UserId>,
    /// Authenticated caller.
    pub actor: SessionIdentity,
}

/// Write side of listing administration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingsCommand: Send + Sync {
    /// Create a listing; an unknown explicit host is `not_found`.
    async fn create(&self, request: CreateListingRequest) -> Result<Listing, Error>;

    /// Apply a partial update.
    async fn update(&self, id: &ListingId, changes: ListingChanges) -> Result<Listing, Error>;

    /// Soft delete by moving the listing to `ARCHIVED`.
    async fn archive(&self, id: &ListingId) -> Result<Listing, Error>;
}

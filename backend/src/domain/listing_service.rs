//! Listing administration use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::lifecycle::{archive, can_transition_listing};
use crate::domain::ports::{
    CreateListingRequest, ListingRepository, ListingsCommand, ListingsQuery, UserRepository,
};
use crate::domain::{
    Error, Listing, ListingChanges, ListingDetail, ListingFilter, ListingId, ListingView,
    NewListing, RECENT_ACTIVITY_LIMIT,
};

fn listing_not_found() -> Error {
    Error::not_found("listing not found")
}

/// Implements [`ListingsQuery`] and [`ListingsCommand`].
#[derive(Clone)]
pub struct ListingService<L, U> {
    listings: Arc<L>,
    users: Arc<U>,
}

impl<L, U> ListingService<L, U> {
    /// Create the service.
    pub fn new(listings: Arc<L>, users: Arc<U>) -> Self {
        Self { listings, users }
    }
}

impl<L, U> ListingService<L, U>
where
    L: ListingRepository,
{
    async fn existing(&self, id: &ListingId) -> Result<Listing, Error> {
        self.listings
            .find_by_id(id)
            .await?
            .ok_or_else(listing_not_found)
    }
}

#[async_trait]
impl<L, U> ListingsQuery for ListingService<L, U>
where
    L: ListingRepository,
    U: UserRepository,
{
    async fn list(
        &self,
        filter: ListingFilter,
        page: PageRequest,
    ) -> Result<Page<ListingView>, Error> {
        Ok(self.listings.list(&filter, page).await?)
    }

    async fn detail(&self, id: &ListingId) -> Result<ListingDetail, Error> {
        self.listings
            .detail(id, RECENT_ACTIVITY_LIMIT)
            .await?
            .ok_or_else(listing_not_found)
    }
}

#[async_trait]
impl<L, U> ListingsCommand for ListingService<L, U>
where
    L: ListingRepository,
    U: UserRepository,
{
    async fn create(&self, request: CreateListingRequest) -> Result<Listing, Error> {
        let host_id = match request.host_id {
            Some(host_id) => {
                self.users
                    .find_by_id(&host_id)
                    .await?
                    .ok_or_else(|| Error::not_found("host not found"))?
                    .id
            }
            None => request.actor.user_id,
        };
        let listing = self
            .listings
            .create(&NewListing {
                draft: request.draft,
                host_id,
            })
            .await?;
        tracing::info!(listing_id = %listing.id, host_id = %host_id, "listing created");
        Ok(listing)
    }

    async fn update(&self, id: &ListingId, changes: ListingChanges) -> Result<Listing, Error> {
        let existing = self.existing(id).await?;
        if let Some(requested) = changes.status {
            can_transition_listing(existing.status, requested)?;
        }
        if changes == ListingChanges::default() {
            return Ok(existing);
        }
        self.listings
            .update(id, &changes)
            .await?
            .ok_or_else(listing_not_found)
    }

    async fn archive(&self, id: &ListingId) -> Result<Listing, Error> {
        let existing = self.existing(id).await?;
        let target = archive(existing.status);
        if existing.status == target {
            return Ok(existing);
        }
        let archived = self
            .listings
            .update(
                id,
                &ListingChanges {
                    status: Some(target),
                    ..ListingChanges::default()
                },
            )
            .await?
            .ok_or_else(listing_not_found)?;
        tracing::info!(listing_id = %id, "listing archived");
        Ok(archived)
    }
}

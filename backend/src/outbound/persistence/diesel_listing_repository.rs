//! PostgreSQL-backed `ListingRepository`.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{ListingPersistenceError, ListingRepository};
use crate::domain::{
    Booking, Listing, ListingBookingExcerpt, ListingChanges, ListingDetail, ListingFilter,
    ListingId, ListingView, NewListing, UserRef,
};

use super::diesel_basic_error_mapping as mapping;
use super::models::{
    BookingRow, ListingChangeset, ListingRow, NewListingRow, UserRefRow, count_for_db,
};
use super::pool::{DbPool, PoolError};
use super::query_helpers::{tallies, tally, total_from_db, window};
use super::schema::{bookings, listings, users};

/// Narrow a boxed listings query by the optional filters.
macro_rules! filter_listings {
    ($query:expr, $filter:expr) => {{
        let mut query = $query;
        if let Some(status) = $filter.status {
            query = query.filter(listings::status.eq(status.as_str()));
        }
        if let Some(host) = $filter.host_id {
            query = query.filter(listings::host_id.eq(*host.as_uuid()));
        }
        query
    }};
}

/// Diesel implementation of [`ListingRepository`].
#[derive(Clone)]
pub struct DieselListingRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselListingRepository {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> ListingPersistenceError {
    mapping::map_pool_error(error, ListingPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ListingPersistenceError {
    mapping::map_diesel_error(
        error,
        ListingPersistenceError::query,
        ListingPersistenceError::connection,
    )
}

fn to_listing(row: ListingRow) -> Result<Listing, ListingPersistenceError> {
    Listing::try_from(row).map_err(ListingPersistenceError::query)
}

fn to_user_ref(row: UserRefRow) -> Result<UserRef, ListingPersistenceError> {
    UserRef::try_from(row).map_err(ListingPersistenceError::query)
}

fn db_count(value: u32, column: &str) -> Result<i32, ListingPersistenceError> {
    count_for_db(value, column).map_err(ListingPersistenceError::query)
}

fn db_count_opt(value: Option<u32>, column: &str) -> Result<Option<i32>, ListingPersistenceError> {
    value.map(|value| db_count(value, column)).transpose()
}

#[async_trait]
impl ListingRepository for DieselListingRepository {
    async fn list(
        &self,
        filter: &ListingFilter,
        page: PageRequest,
    ) -> Result<Page<ListingView>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (limit, offset) = window(page);

        let total: i64 = filter_listings!(listings::table.into_boxed(), filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<(ListingRow, UserRefRow)> =
            filter_listings!(listings::table.inner_join(users::table).into_boxed(), filter)
                .order((listings::created_at.desc(), listings::id.desc()))
                .limit(limit)
                .offset(offset)
                .select((ListingRow::as_select(), UserRefRow::as_select()))
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|(listing, _)| listing.id).collect();
        let booking_counts = tallies(
            bookings::table
                .filter(bookings::listing_id.eq_any(&ids))
                .group_by(bookings::listing_id)
                .select((bookings::listing_id, count_star()))
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?,
        );

        let views = rows
            .into_iter()
            .map(|(listing, host)| {
                let id = listing.id;
                Ok(ListingView {
                    listing: to_listing(listing)?,
                    host: to_user_ref(host)?,
                    booking_count: tally(&booking_counts, &id),
                })
            })
            .collect::<Result<Vec<_>, ListingPersistenceError>>()?;

        Ok(Page::new(views, page, total_from_db(total)))
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = listings::table
            .find(*id.as_uuid())
            .select(ListingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(to_listing).transpose()
    }

    async fn detail(
        &self,
        id: &ListingId,
        recent: u32,
    ) -> Result<Option<ListingDetail>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let Some((listing, host)) = listings::table
            .inner_join(users::table)
            .filter(listings::id.eq(*id.as_uuid()))
            .select((ListingRow::as_select(), UserRefRow::as_select()))
            .first::<(ListingRow, UserRefRow)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };

        let recent_rows: Vec<(BookingRow, UserRefRow)> = bookings::table
            .inner_join(users::table)
            .filter(bookings::listing_id.eq(*id.as_uuid()))
            .order((bookings::created_at.desc(), bookings::id.desc()))
            .limit(i64::from(recent))
            .select((BookingRow::as_select(), UserRefRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let recent_bookings = recent_rows
            .into_iter()
            .map(|(booking, guest)| {
                let booking = Booking::try_from(booking).map_err(ListingPersistenceError::query)?;
                Ok(ListingBookingExcerpt {
                    id: booking.id,
                    check_in: booking.check_in,
                    check_out: booking.check_out,
                    status: booking.status,
                    total_price: booking.total_price,
                    guest: to_user_ref(guest)?,
                })
            })
            .collect::<Result<Vec<_>, ListingPersistenceError>>()?;

        Ok(Some(ListingDetail {
            listing: to_listing(listing)?,
            host: to_user_ref(host)?,
            recent_bookings,
        }))
    }

    async fn create(&self, listing: &NewListing) -> Result<Listing, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = self.clock.utc();
        let draft = &listing.draft;

        let row = NewListingRow {
            id: *ListingId::random().as_uuid(),
            title: &draft.title,
            description: &draft.description,
            location: &draft.location,
            price_per_night_cents: draft.price_per_night.cents(),
            max_guests: db_count(draft.max_guests, "max_guests")?,
            bedrooms: db_count(draft.bedrooms, "bedrooms")?,
            bathrooms: db_count(draft.bathrooms, "bathrooms")?,
            image_url: draft.image_url.as_deref(),
            status: draft.status.as_str(),
            host_id: *listing.host_id.as_uuid(),
            created_at: now,
            updated_at: now,
        };

        let stored = diesel::insert_into(listings::table)
            .values(&row)
            .returning(ListingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        to_listing(stored)
    }

    async fn update(
        &self,
        id: &ListingId,
        changes: &ListingChanges,
    ) -> Result<Option<Listing>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = ListingChangeset {
            title: changes.title.as_deref(),
            description: changes.description.as_deref(),
            location: changes.location.as_deref(),
            price_per_night_cents: changes.price_per_night.map(|price| price.cents()),
            max_guests: db_count_opt(changes.max_guests, "max_guests")?,
            bedrooms: db_count_opt(changes.bedrooms, "bedrooms")?,
            bathrooms: db_count_opt(changes.bathrooms, "bathrooms")?,
            image_url: changes.image_url.as_ref().map(Option::as_deref),
            status: changes.status.map(|status| status.as_str()),
            updated_at: self.clock.utc(),
        };

        let row = diesel::update(listings::table.find(*id.as_uuid()))
            .set(&changeset)
            .returning(ListingRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(to_listing).transpose()
    }
}

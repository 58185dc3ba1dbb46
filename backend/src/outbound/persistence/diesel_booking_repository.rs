//! PostgreSQL-backed `BookingRepository`.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use pagination::{Page, PageRequest};

use crate::domain::ports::{BookingPersistenceError, BookingRepository};
use crate::domain::{
    Booking, BookingFilter, BookingId, BookingListingExcerpt, BookingStatus, BookingView,
    NewBooking, UserRef,
};

use super::diesel_basic_error_mapping as mapping;
use super::models::{BookingRow, ListingRow, NewBookingRow, UserRefRow, count_for_db};
use super::pool::{DbPool, PoolError};
use super::query_helpers::{total_from_db, window};
use super::schema::{bookings, listings, users};

macro_rules! filter_bookings {
    ($query:expr, $filter:expr) => {{
        let mut query = $query;
        if let Some(status) = $filter.status {
            query = query.filter(bookings::status.eq(status.as_str()));
        }
        if let Some(user) = $filter.user_id {
            query = query.filter(bookings::user_id.eq(*user.as_uuid()));
        }
        if let Some(listing) = $filter.listing_id {
            query = query.filter(bookings::listing_id.eq(*listing.as_uuid()));
        }
        query
    }};
}

/// Diesel implementation of [`BookingRepository`].
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselBookingRepository {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> BookingPersistenceError {
    mapping::map_pool_error(error, BookingPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BookingPersistenceError {
    mapping::map_diesel_error(
        error,
        BookingPersistenceError::query,
        BookingPersistenceError::connection,
    )
}

fn to_booking(row: BookingRow) -> Result<Booking, BookingPersistenceError> {
    Booking::try_from(row).map_err(BookingPersistenceError::query)
}

fn to_view(
    (booking, guest, listing): (BookingRow, UserRefRow, ListingRow),
) -> Result<BookingView, BookingPersistenceError> {
    Ok(BookingView {
        booking: to_booking(booking)?,
        guest: UserRef::try_from(guest).map_err(BookingPersistenceError::query)?,
        listing: BookingListingExcerpt::try_from(listing)
            .map_err(BookingPersistenceError::query)?,
    })
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn list(
        &self,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> Result<Page<BookingView>, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (limit, offset) = window(page);

        let total: i64 = filter_bookings!(bookings::table.into_boxed(), filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<(BookingRow, UserRefRow, ListingRow)> = filter_bookings!(
            bookings::table
                .inner_join(users::table)
                .inner_join(listings::table)
                .into_boxed(),
            filter
        )
        .order((bookings::created_at.desc(), bookings::id.desc()))
        .limit(limit)
        .offset(offset)
        .select((
            BookingRow::as_select(),
            UserRefRow::as_select(),
            ListingRow::as_select(),
        ))
        .load(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        let views = rows
            .into_iter()
            .map(to_view)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(views, page, total_from_db(total)))
    }

    async fn find_by_id(
        &self,
        id: &BookingId,
    ) -> Result<Option<BookingView>, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = bookings::table
            .inner_join(users::table)
            .inner_join(listings::table)
            .filter(bookings::id.eq(*id.as_uuid()))
            .select((
                BookingRow::as_select(),
                UserRefRow::as_select(),
                ListingRow::as_select(),
            ))
            .first::<(BookingRow, UserRefRow, ListingRow)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(to_view).transpose()
    }

    async fn create(&self, booking: &NewBooking) -> Result<Booking, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = self.clock.utc();

        let row = NewBookingRow {
            id: *BookingId::random().as_uuid(),
            check_in: booking.check_in,
            check_out: booking.check_out,
            total_price_cents: booking.total_price.cents(),
            guests: count_for_db(booking.guests, "guests")
                .map_err(BookingPersistenceError::query)?,
            status: BookingStatus::Pending.as_str(),
            user_id: *booking.user_id.as_uuid(),
            listing_id: *booking.listing_id.as_uuid(),
            created_at: now,
            updated_at: now,
        };

        let stored = diesel::insert_into(bookings::table)
            .values(&row)
            .returning(BookingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        to_booking(stored)
    }

    async fn update_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(bookings::table.find(*id.as_uuid()))
            .set((
                bookings::status.eq(status.as_str()),
                bookings::updated_at.eq(self.clock.utc()),
            ))
            .returning(BookingRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(to_booking).transpose()
    }
}

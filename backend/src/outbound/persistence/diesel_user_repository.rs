//! PostgreSQL-backed `UserRepository`.
//!
//! Summary counts come from two grouped queries over the page's user ids
//! rather than per-row subqueries.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{UserCredentialRecord, UserPersistenceError, UserRepository};
use crate::domain::{
    Booking, Email, GuestBookingExcerpt, HostedListingExcerpt, Listing, User, UserChanges,
    UserDetail, UserId, UserSummary,
};

use super::diesel_basic_error_mapping as mapping;
use super::models::{BookingRow, ListingRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::query_helpers::{tallies, tally, total_from_db, window};
use super::schema::{bookings, listings, users};

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    mapping::map_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    mapping::map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    User::try_from(row).map_err(UserPersistenceError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(to_user).transpose()
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentialRecord>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(UserRow, String)> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select((UserRow::as_select(), users::password_hash))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|(user, password_hash)| {
            Ok(UserCredentialRecord {
                user: to_user(user)?,
                password_hash,
            })
        })
        .transpose()
    }

    async fn list(&self, page: PageRequest) -> Result<Page<UserSummary>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (limit, offset) = window(page);

        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<UserRow> = users::table
            .order((users::created_at.desc(), users::id.desc()))
            .limit(limit)
            .offset(offset)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

        let listing_counts = tallies(
            listings::table
                .filter(listings::host_id.eq_any(&ids))
                .group_by(listings::host_id)
                .select((listings::host_id, count_star()))
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?,
        );
        let booking_counts = tallies(
            bookings::table
                .filter(bookings::user_id.eq_any(&ids))
                .group_by(bookings::user_id)
                .select((bookings::user_id, count_star()))
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?,
        );

        let summaries = rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                Ok(UserSummary {
                    user: to_user(row)?,
                    listing_count: tally(&listing_counts, &id),
                    booking_count: tally(&booking_counts, &id),
                })
            })
            .collect::<Result<Vec<_>, UserPersistenceError>>()?;

        Ok(Page::new(summaries, page, total_from_db(total)))
    }

    async fn detail(
        &self,
        id: &UserId,
        recent: u32,
    ) -> Result<Option<UserDetail>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let recent = i64::from(recent);

        let Some(row) = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };

        let hosted: Vec<ListingRow> = listings::table
            .filter(listings::host_id.eq(*id.as_uuid()))
            .order((listings::created_at.desc(), listings::id.desc()))
            .limit(recent)
            .select(ListingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let own: Vec<(BookingRow, String, String)> = bookings::table
            .inner_join(listings::table)
            .filter(bookings::user_id.eq(*id.as_uuid()))
            .order((bookings::created_at.desc(), bookings::id.desc()))
            .limit(recent)
            .select((BookingRow::as_select(), listings::title, listings::location))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let recent_listings = hosted
            .into_iter()
            .map(|row| {
                let listing = Listing::try_from(row).map_err(UserPersistenceError::query)?;
                Ok(HostedListingExcerpt {
                    id: listing.id,
                    title: listing.title,
                    location: listing.location,
                    status: listing.status,
                    price_per_night: listing.price_per_night,
                })
            })
            .collect::<Result<Vec<_>, UserPersistenceError>>()?;

        let recent_bookings = own
            .into_iter()
            .map(|(row, listing_title, listing_location)| {
                let booking = Booking::try_from(row).map_err(UserPersistenceError::query)?;
                Ok(GuestBookingExcerpt {
                    id: booking.id,
                    check_in: booking.check_in,
                    check_out: booking.check_out,
                    status: booking.status,
                    total_price: booking.total_price,
                    listing_title,
                    listing_location,
                })
            })
            .collect::<Result<Vec<_>, UserPersistenceError>>()?;

        Ok(Some(UserDetail {
            user: to_user(row)?,
            recent_listings,
            recent_bookings,
        }))
    }

    async fn update(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = UserChangeset {
            name: changes.name.as_ref().map(AsRef::as_ref),
            is_blocked: changes.is_blocked,
            updated_at: self.clock.utc(),
        };

        let row = diesel::update(users::table.find(*id.as_uuid()))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(to_user).transpose()
    }
}

//! Internal Diesel row structs and their conversions into domain types.
//!
//! Rows never leave the persistence layer. Conversions are fallible because
//! the database could hold values the domain rejects (an unknown status, a
//! negative count); such rows surface as query errors rather than panics.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Booking, BookingId, BookingListingExcerpt, BookingStatus, DisplayName, Email, Listing,
    ListingId, ListingStatus, Money, User, UserId, UserRef, UserRole,
};

use super::schema::{bookings, listings, users};

/// Row conversion failure description.
pub(crate) type RowError = String;

pub(crate) fn count_from_db(value: i32, column: &str) -> Result<u32, RowError> {
    u32::try_from(value).map_err(|_| format!("{column} holds negative value {value}"))
}

pub(crate) fn count_for_db(value: u32, column: &str) -> Result<i32, RowError> {
    i32::try_from(value).map_err(|_| format!("{column} value {value} exceeds column range"))
}

pub(crate) fn tally_from_db(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn parse_column<T>(raw: &str, column: &str) -> Result<T, RowError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|err| format!("stored {column} is invalid: {err}"))
}

fn email(raw: String) -> Result<Email, RowError> {
    Email::new(raw).map_err(|err| format!("stored email is invalid: {err}"))
}

fn display_name(raw: String) -> Result<DisplayName, RowError> {
    DisplayName::new(raw).map_err(|err| format!("stored name is invalid: {err}"))
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RowError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            email: email(row.email)?,
            name: display_name(row.name)?,
            role: parse_column::<UserRole>(&row.role, "role")?,
            is_blocked: row.is_blocked,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// The columns embedded wherever another read model references a user.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRefRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl TryFrom<UserRefRow> for UserRef {
    type Error = RowError;

    fn try_from(row: UserRefRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            name: display_name(row.name)?,
            email: email(row.email)?,
            role: parse_column::<UserRole>(&row.role, "role")?,
        })
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub name: Option<&'a str>,
    pub is_blocked: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ListingRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub price_per_night_cents: i64,
    pub max_guests: i32,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub image_url: Option<String>,
    pub status: String,
    pub host_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = RowError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ListingId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            location: row.location,
            price_per_night: Money::from_cents(row.price_per_night_cents),
            max_guests: count_from_db(row.max_guests, "max_guests")?,
            bedrooms: count_from_db(row.bedrooms, "bedrooms")?,
            bathrooms: count_from_db(row.bathrooms, "bathrooms")?,
            image_url: row.image_url,
            status: parse_column::<ListingStatus>(&row.status, "listing status")?,
            host_id: UserId::from_uuid(row.host_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<ListingRow> for BookingListingExcerpt {
    type Error = RowError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let listing = Listing::try_from(row)?;
        Ok(Self {
            id: listing.id,
            title: listing.title,
            location: listing.location,
            price_per_night: listing.price_per_night,
            max_guests: listing.max_guests,
            status: listing.status,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = listings)]
pub(crate) struct NewListingRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub price_per_night_cents: i64,
    pub max_guests: i32,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub image_url: Option<&'a str>,
    pub status: &'a str,
    pub host_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `image_url: Some(None)` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = listings)]
pub(crate) struct ListingChangeset<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub location: Option<&'a str>,
    pub price_per_night_cents: Option<i64>,
    pub max_guests: Option<i32>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub image_url: Option<Option<&'a str>>,
    pub status: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub total_price_cents: i64,
    pub guests: i32,
    pub status: String,
    pub user_id: Uuid,
    pub listing_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = RowError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BookingId::from_uuid(row.id),
            check_in: row.check_in,
            check_out: row.check_out,
            total_price: Money::from_cents(row.total_price_cents),
            guests: count_from_db(row.guests, "guests")?,
            status: parse_column::<BookingStatus>(&row.status, "booking status")?,
            user_id: UserId::from_uuid(row.user_id),
            listing_id: ListingId::from_uuid(row.listing_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub total_price_cents: i64,
    pub guests: i32,
    pub status: &'a str,
    pub user_id: Uuid,
    pub listing_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//! Rental listing data model and field validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::id::define_id;
use super::user::UnknownVariant;
use super::{BookingId, BookingStatus, Money, UserId, UserRef};

define_id!(
    /// Stable listing identifier.
    ListingId,
    "listing id"
);

/// Title length bounds in characters.
pub const TITLE_LEN: (usize, usize) = (3, 100);
/// Description length bounds in characters.
pub const DESCRIPTION_LEN: (usize, usize) = (10, 1000);
/// Minimum location length in characters.
pub const LOCATION_MIN: usize = 3;

/// Publication state of a listing.
///
/// There are no terminal listing states: any status may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    /// Visible and bookable.
    #[default]
    Active,
    /// Temporarily hidden by the host or an admin.
    Inactive,
    /// Soft-deleted.
    Archived,
}

impl ListingStatus {
    /// Stable storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ListingStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            "ARCHIVED" => Ok(Self::Archived),
            other => Err(UnknownVariant::new("listing status", other)),
        }
    }
}

/// Field-level validation failures for listing input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingValidationError {
    /// Title outside the accepted length range.
    #[error("title must be between {min} and {max} characters")]
    TitleLength { min: usize, max: usize },
    /// Description outside the accepted length range.
    #[error("description must be between {min} and {max} characters")]
    DescriptionLength { min: usize, max: usize },
    /// Location shorter than the minimum.
    #[error("location must be at least {min} characters")]
    LocationTooShort { min: usize },
    /// Nightly price was zero or negative.
    #[error("pricePerNight must be positive")]
    NonPositivePrice,
    /// A capacity field was zero.
    #[error("{field} must be a positive integer")]
    NonPositiveCount { field: &'static str },
    /// Image URL is neither empty nor an http(s) URL.
    #[error("imageUrl must be a valid http or https URL")]
    InvalidImageUrl,
}

impl ListingValidationError {
    /// Wire name of the offending field.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::TitleLength { .. } => "title",
            Self::DescriptionLength { .. } => "description",
            Self::LocationTooShort { .. } => "location",
            Self::NonPositivePrice => "pricePerNight",
            Self::NonPositiveCount { field } => *field,
            Self::InvalidImageUrl => "imageUrl",
        }
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Validate a listing title.
pub fn validate_title(raw: &str) -> Result<String, ListingValidationError> {
    let (min, max) = TITLE_LEN;
    let value = raw.trim();
    if !(min..=max).contains(&char_len(value)) {
        return Err(ListingValidationError::TitleLength { min, max });
    }
    Ok(value.to_owned())
}

/// Validate a listing description.
pub fn validate_description(raw: &str) -> Result<String, ListingValidationError> {
    let (min, max) = DESCRIPTION_LEN;
    let value = raw.trim();
    if !(min..=max).contains(&char_len(value)) {
        return Err(ListingValidationError::DescriptionLength { min, max });
    }
    Ok(value.to_owned())
}

/// Validate a listing location.
pub fn validate_location(raw: &str) -> Result<String, ListingValidationError> {
    let value = raw.trim();
    if char_len(value) < LOCATION_MIN {
        return Err(ListingValidationError::LocationTooShort { min: LOCATION_MIN });
    }
    Ok(value.to_owned())
}

/// Validate a nightly price.
pub const fn validate_price(price: Money) -> Result<Money, ListingValidationError> {
    if price.is_positive() {
        Ok(price)
    } else {
        Err(ListingValidationError::NonPositivePrice)
    }
}

/// Validate a capacity field such as `maxGuests`.
pub const fn validate_count(value: u32, field: &'static str) -> Result<u32, ListingValidationError> {
    if value == 0 {
        Err(ListingValidationError::NonPositiveCount { field })
    } else {
        Ok(value)
    }
}

/// Validate an optional image URL; blank input clears the image.
pub fn validate_image_url(raw: &str) -> Result<Option<String>, ListingValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let parsed = Url::parse(value).map_err(|_| ListingValidationError::InvalidImageUrl)?;
    let web_scheme = matches!(parsed.scheme(), "http" | "https");
    if !web_scheme || parsed.host_str().is_none_or(str::is_empty) {
        return Err(ListingValidationError::InvalidImageUrl);
    }
    Ok(Some(value.to_owned()))
}

/// Listing as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub price_per_night: Money,
    pub max_guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub image_url: Option<String>,
    pub status: ListingStatus,
    pub host_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub price_per_night: Money,
    pub max_guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub image_url: Option<String>,
    pub status: ListingStatus,
}

/// Insert payload handed to the repository once the host is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub draft: ListingDraft,
    pub host_id: UserId,
}

/// Validated partial update; `None` leaves the field untouched.
///
/// `image_url` is doubly optional: `Some(None)` clears the image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price_per_night: Option<Money>,
    pub max_guests: Option<u32>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub image_url: Option<Option<String>>,
    pub status: Option<ListingStatus>,
}

/// Filters accepted by the listings index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub status: Option<ListingStatus>,
    pub host_id: Option<UserId>,
}

/// Listing row in the admin list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingView {
    pub listing: Listing,
    pub host: UserRef,
    pub booking_count: u64,
}

/// Booking excerpt shown on a listing's detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingBookingExcerpt {
    pub id: BookingId,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub status: BookingStatus,
    pub total_price: Money,
    pub guest: UserRef,
}

/// Listing with host and its most recent bookings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDetail {
    pub listing: Listing,
    pub host: UserRef,
    pub recent_bookings: Vec<ListingBookingExcerpt>,
}

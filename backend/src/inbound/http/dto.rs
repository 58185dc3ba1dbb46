//! JSON response bodies.
//!
//! Domain read models stay serialisation-free; these adapter types fix the
//! camelCase wire shape. Prices leave the server as major units.

use chrono::{DateTime, Utc};
use pagination::Page;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    Booking, BookingView, GuestBookingExcerpt, HostedListingExcerpt, Listing,
    ListingBookingExcerpt, ListingDetail, ListingView, Money, User, UserDetail, UserRef,
    UserSummary,
};

fn major_units(amount: Money) -> f64 {
    amount.to_major_units()
}

/// Pagination block of every list response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationBody {
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub limit: u32,
    #[schema(example = 42)]
    pub total: u64,
    #[schema(example = 5)]
    pub total_pages: u64,
}

/// `{items, pagination}` envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct PageBody<T> {
    pub items: Vec<T>,
    pub pagination: PaginationBody,
}

impl<T> PageBody<T> {
    pub fn from_page<D>(page: Page<D>, convert: impl Fn(D) -> T) -> Self {
        let meta = page.pagination();
        let pagination = PaginationBody {
            page: meta.page(),
            limit: meta.limit(),
            total: meta.total(),
            total_pages: meta.total_pages(),
        };
        Self {
            items: page.into_items().into_iter().map(convert).collect(),
            pagination,
        }
    }
}

/// Account as exposed to administrators.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    pub id: Uuid,
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ADMIN")]
    pub role: String,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserBody {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            email: user.email.as_ref().to_owned(),
            name: user.name.as_ref().to_owned(),
            role: user.role.as_str().to_owned(),
            is_blocked: user.is_blocked,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Signed-in caller returned by `/auth/login` and `/auth/me`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserBody {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub is_blocked: bool,
}

impl From<&User> for SessionUserBody {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            email: user.email.as_ref().to_owned(),
            name: user.name.as_ref().to_owned(),
            role: user.role.as_str().to_owned(),
            is_blocked: user.is_blocked,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionEnvelope {
    pub user: SessionUserBody,
}

/// Compact user reference embedded in other bodies.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRefBody {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&UserRef> for UserRefBody {
    fn from(user: &UserRef) -> Self {
        Self {
            id: *user.id.as_uuid(),
            name: user.name.as_ref().to_owned(),
            email: user.email.as_ref().to_owned(),
            role: user.role.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryBody {
    #[serde(flatten)]
    pub user: UserBody,
    pub listing_count: u64,
    pub booking_count: u64,
}

impl From<UserSummary> for UserSummaryBody {
    fn from(summary: UserSummary) -> Self {
        Self {
            user: UserBody::from(&summary.user),
            listing_count: summary.listing_count,
            booking_count: summary.booking_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HostedListingBody {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub status: String,
    pub price_per_night: f64,
}

impl From<&HostedListingExcerpt> for HostedListingBody {
    fn from(listing: &HostedListingExcerpt) -> Self {
        Self {
            id: *listing.id.as_uuid(),
            title: listing.title.clone(),
            location: listing.location.clone(),
            status: listing.status.as_str().to_owned(),
            price_per_night: major_units(listing.price_per_night),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestBookingBody {
    pub id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub status: String,
    pub total_price: f64,
    pub listing_title: String,
    pub listing_location: String,
}

impl From<&GuestBookingExcerpt> for GuestBookingBody {
    fn from(booking: &GuestBookingExcerpt) -> Self {
        Self {
            id: *booking.id.as_uuid(),
            check_in: booking.check_in,
            check_out: booking.check_out,
            status: booking.status.as_str().to_owned(),
            total_price: major_units(booking.total_price),
            listing_title: booking.listing_title.clone(),
            listing_location: booking.listing_location.clone(),
        }
    }
}

/// User with recent hosting and booking activity.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailBody {
    #[serde(flatten)]
    pub user: UserBody,
    pub recent_listings: Vec<HostedListingBody>,
    pub recent_bookings: Vec<GuestBookingBody>,
}

impl From<UserDetail> for UserDetailBody {
    fn from(detail: UserDetail) -> Self {
        Self {
            user: UserBody::from(&detail.user),
            recent_listings: detail
                .recent_listings
                .iter()
                .map(HostedListingBody::from)
                .collect(),
            recent_bookings: detail
                .recent_bookings
                .iter()
                .map(GuestBookingBody::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope<T> {
    pub user: T,
}

/// Listing as stored.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingBody {
    pub id: Uuid,
    #[schema(example = "Harbour loft")]
    pub title: String,
    pub description: String,
    pub location: String,
    #[schema(example = 150.0)]
    pub price_per_night: f64,
    pub max_guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub image_url: Option<String>,
    #[schema(example = "ACTIVE")]
    pub status: String,
    pub host_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Listing> for ListingBody {
    fn from(listing: &Listing) -> Self {
        Self {
            id: *listing.id.as_uuid(),
            title: listing.title.clone(),
            description: listing.description.clone(),
            location: listing.location.clone(),
            price_per_night: major_units(listing.price_per_night),
            max_guests: listing.max_guests,
            bedrooms: listing.bedrooms,
            bathrooms: listing.bathrooms,
            image_url: listing.image_url.clone(),
            status: listing.status.as_str().to_owned(),
            host_id: *listing.host_id.as_uuid(),
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingViewBody {
    #[serde(flatten)]
    pub listing: ListingBody,
    pub host: UserRefBody,
    pub booking_count: u64,
}

impl From<ListingView> for ListingViewBody {
    fn from(view: ListingView) -> Self {
        Self {
            listing: ListingBody::from(&view.listing),
            host: UserRefBody::from(&view.host),
            booking_count: view.booking_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingBookingBody {
    pub id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub status: String,
    pub total_price: f64,
    pub guest: UserRefBody,
}

impl From<&ListingBookingExcerpt> for ListingBookingBody {
    fn from(booking: &ListingBookingExcerpt) -> Self {
        Self {
            id: *booking.id.as_uuid(),
            check_in: booking.check_in,
            check_out: booking.check_out,
            status: booking.status.as_str().to_owned(),
            total_price: major_units(booking.total_price),
            guest: UserRefBody::from(&booking.guest),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetailBody {
    #[serde(flatten)]
    pub listing: ListingBody,
    pub host: UserRefBody,
    pub recent_bookings: Vec<ListingBookingBody>,
}

impl From<ListingDetail> for ListingDetailBody {
    fn from(detail: ListingDetail) -> Self {
        Self {
            listing: ListingBody::from(&detail.listing),
            host: UserRefBody::from(&detail.host),
            recent_bookings: detail
                .recent_bookings
                .iter()
                .map(ListingBookingBody::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingEnvelope<T> {
    pub listing: T,
}

/// Result of a soft delete.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessBody {
    #[schema(example = true)]
    pub success: bool,
}

/// Booking as stored.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingBody {
    pub id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    #[schema(example = 450.0)]
    pub total_price: f64,
    pub guest_count: u32,
    #[schema(example = "PENDING")]
    pub status: String,
    pub user_id: Uuid,
    pub listing_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Booking> for BookingBody {
    fn from(booking: &Booking) -> Self {
        Self {
            id: *booking.id.as_uuid(),
            check_in: booking.check_in,
            check_out: booking.check_out,
            total_price: major_units(booking.total_price),
            guest_count: booking.guests,
            status: booking.status.as_str().to_owned(),
            user_id: *booking.user_id.as_uuid(),
            listing_id: *booking.listing_id.as_uuid(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingListingBody {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub price_per_night: f64,
    pub max_guests: u32,
    pub status: String,
}

/// Booking with guest and listing summaries.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingViewBody {
    #[serde(flatten)]
    pub booking: BookingBody,
    pub user: UserRefBody,
    pub listing: BookingListingBody,
}

impl From<BookingView> for BookingViewBody {
    fn from(view: BookingView) -> Self {
        let listing = &view.listing;
        Self {
            booking: BookingBody::from(&view.booking),
            user: UserRefBody::from(&view.guest),
            listing: BookingListingBody {
                id: *listing.id.as_uuid(),
                title: listing.title.clone(),
                location: listing.location.clone(),
                price_per_night: major_units(listing.price_per_night),
                max_guests: listing.max_guests,
                status: listing.status.as_str().to_owned(),
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingEnvelope<T> {
    pub booking: T,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookingStatus, UserId};
    use crate::test_support::fixtures;
    use pagination::PageRequest;
    use serde_json::{Value, json};

    #[test]
    fn list_envelope_carries_pagination() {
        let request = PageRequest::new(2, 10).expect("page");
        let page = Page::new(vec![fixtures::guest()], request, 11);
        let body = PageBody::from_page(page, |user| UserBody::from(&user));
        let value = serde_json::to_value(&body).expect("json");

        assert_eq!(
            value["pagination"],
            json!({"page": 2, "limit": 10, "total": 11, "totalPages": 2})
        );
        assert_eq!(value["items"][0]["email"], "guest@example.com");
        assert_eq!(value["items"][0]["isBlocked"], false);
    }

    #[test]
    fn booking_totals_leave_as_major_units() {
        let listing = fixtures::listing(UserId::random());
        let booking = fixtures::booking(&listing, UserId::random(), BookingStatus::Pending);
        let value = serde_json::to_value(BookingBody::from(&booking)).expect("json");

        assert_eq!(value["totalPrice"], json!(450.0));
        assert_eq!(value["status"], "PENDING");
        assert!(value.get("total_price").is_none());
    }

    #[test]
    fn summaries_flatten_user_fields() {
        let summary = UserSummary {
            user: fixtures::admin(),
            listing_count: 3,
            booking_count: 1,
        };
        let value = serde_json::to_value(UserSummaryBody::from(summary)).expect("json");

        assert_eq!(value["role"], "ADMIN");
        assert_eq!(value["listingCount"], 3);
        assert_eq!(value["bookingCount"], 1);
        assert!(value.get("user").is_none());
        assert!(value.get("passwordHash").is_none());
    }

    #[test]
    fn listings_expose_host_id() {
        let host = UserId::random();
        let value: Value =
            serde_json::to_value(ListingBody::from(&fixtures::listing(host))).expect("json");
        assert_eq!(value["hostId"], host.to_string());
        assert_eq!(value["pricePerNight"], json!(150.0));
    }
}

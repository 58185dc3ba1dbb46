//! Booking use-cases: pricing on creation and guarded status changes.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::lifecycle::{
    BookingRequest, ListingTerms, RuleViolation, can_transition_booking, quote_booking,
};
use crate::domain::ports::{
    BookingRepository, BookingsCommand, BookingsQuery, CreateBookingRequest, ListingRepository,
    UserRepository,
};
use crate::domain::{
    Booking, BookingFilter, BookingId, BookingStatus, BookingView, Error, NewBooking,
};

fn booking_not_found() -> Error {
    Error::not_found("booking not found")
}

fn refused(violation: RuleViolation, action: &'static str) -> Error {
    tracing::info!(code = violation.code(), action, "booking rule violated");
    Error::from(violation)
}

/// Implements [`BookingsQuery`] and [`BookingsCommand`].
#[derive(Clone)]
pub struct BookingService<B, L, U> {
    bookings: Arc<B>,
    listings: Arc<L>,
    users: Arc<U>,
}

impl<B, L, U> BookingService<B, L, U> {
    /// Create the service.
    pub fn new(bookings: Arc<B>, listings: Arc<L>, users: Arc<U>) -> Self {
        Self {
            bookings,
            listings,
            users,
        }
    }
}

#[async_trait]
impl<B, L, U> BookingsQuery for BookingService<B, L, U>
where
    B: BookingRepository,
    L: ListingRepository,
    U: UserRepository,
{
    async fn list(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Page<BookingView>, Error> {
        Ok(self.bookings.list(&filter, page).await?)
    }

    async fn detail(&self, id: &BookingId) -> Result<BookingView, Error> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or_else(booking_not_found)
    }
}

#[async_trait]
impl<B, L, U> BookingsCommand for BookingService<B, L, U>
where
    B: BookingRepository,
    L: ListingRepository,
    U: UserRepository,
{
    async fn create(&self, request: CreateBookingRequest) -> Result<Booking, Error> {
        let listing = self
            .listings
            .find_by_id(&request.listing_id)
            .await?
            .ok_or_else(|| Error::not_found("listing not found"))?;

        let guest_id = match request.user_id {
            Some(user_id) => {
                self.users
                    .find_by_id(&user_id)
                    .await?
                    .ok_or_else(|| Error::not_found("user not found"))?
                    .id
            }
            None => request.actor.user_id,
        };

        let quote = quote_booking(
            BookingRequest {
                check_in: request.check_in,
                check_out: request.check_out,
                guests: request.guests,
            },
            ListingTerms {
                max_guests: listing.max_guests,
                price_per_night: listing.price_per_night,
            },
        )
        .map_err(|violation| refused(violation, "create"))?;

        let booking = self
            .bookings
            .create(&NewBooking {
                check_in: request.check_in,
                check_out: request.check_out,
                total_price: quote.total_price,
                guests: request.guests,
                user_id: guest_id,
                listing_id: listing.id,
            })
            .await?;
        tracing::info!(
            booking_id = %booking.id,
            listing_id = %listing.id,
            nights = quote.nights,
            total = %quote.total_price,
            "booking created"
        );
        Ok(booking)
    }

    async fn update_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<Booking, Error> {
        let current = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(booking_not_found)?;
        can_transition_booking(current.booking.status, status)
            .map_err(|violation| refused(violation, "update_status"))?;

        let updated = self
            .bookings
            .update_status(id, status)
            .await?
            .ok_or_else(booking_not_found)?;
        tracing::info!(
            booking_id = %id,
            from = %current.booking.status,
            to = %status,
            "booking status changed"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockBookingRepository, MockListingRepository, MockUserRepository};
    use crate::domain::{
        BookingListingExcerpt, ErrorCode, Listing, ListingId, Money, UserId, UserRef,
    };
    use crate::test_support::fixtures::{self, day};
    use chrono::{DateTime, Utc};
    use rstest::rstest;

    type Service = BookingService<MockBookingRepository, MockListingRepository, MockUserRepository>;

    fn service(
        bookings: MockBookingRepository,
        listings: MockListingRepository,
        users: MockUserRepository,
    ) -> Service {
        BookingService::new(Arc::new(bookings), Arc::new(listings), Arc::new(users))
    }

    fn listings_returning(listing: Listing) -> MockListingRepository {
        let mut listings = MockListingRepository::new();
        listings
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(listing)));
        listings
    }

    fn request(
        listing_id: ListingId,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        guests: u32,
    ) -> CreateBookingRequest {
        CreateBookingRequest {
            listing_id,
            user_id: None,
            check_in,
            check_out,
            guests,
            actor: fixtures::identity(&fixtures::admin()),
        }
    }

    fn view(status: BookingStatus) -> BookingView {
        let guest = fixtures::guest();
        let listing = fixtures::listing(UserId::random());
        BookingView {
            booking: fixtures::booking(&listing, guest.id, status),
            guest: UserRef::from(&guest),
            listing: BookingListingExcerpt {
                id: listing.id,
                title: listing.title,
                location: listing.location,
                price_per_night: listing.price_per_night,
                max_guests: listing.max_guests,
                status: listing.status,
            },
        }
    }

    #[tokio::test]
    async fn three_nights_at_150_costs_450() {
        let listing = fixtures::listing(UserId::random());
        let listing_id = listing.id;
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_create()
            .withf(|new| new.total_price == Money::from_cents(45_000))
            .times(1)
            .returning(|new| {
                let listing = fixtures::listing(UserId::random());
                let mut booking = fixtures::booking(&listing, new.user_id, BookingStatus::Pending);
                booking.listing_id = new.listing_id;
                booking.total_price = new.total_price;
                Ok(booking)
            });

        let booking = service(bookings, listings_returning(listing), MockUserRepository::new())
            .create(request(listing_id, day(3, 1), day(3, 4), 2))
            .await
            .expect("booking created");
        assert_eq!(booking.total_price, Money::from_cents(45_000));
        assert_eq!(booking.status, BookingStatus::Pending);
    }

    #[rstest]
    #[case(day(3, 4), day(3, 4), 2, "invalid_date_range")]
    #[case(day(3, 4), day(3, 1), 2, "invalid_date_range")]
    #[case(day(3, 1), day(3, 4), 5, "guest_count_exceeded")]
    #[tokio::test]
    async fn rule_violations_persist_nothing(
        #[case] check_in: DateTime<Utc>,
        #[case] check_out: DateTime<Utc>,
        #[case] guests: u32,
        #[case] code: &str,
    ) {
        let listing = fixtures::listing(UserId::random());
        let listing_id = listing.id;
        let mut bookings = MockBookingRepository::new();
        bookings.expect_create().never();

        let err = service(bookings, listings_returning(listing), MockUserRepository::new())
            .create(request(listing_id, check_in, check_out, guests))
            .await
            .expect_err("rule violation");
        assert_eq!(err.code(), ErrorCode::BusinessRuleViolation);
        assert_eq!(err.details().expect("details")["code"], code);
    }

    #[tokio::test]
    async fn unknown_listing_is_not_found() {
        let mut listings = MockListingRepository::new();
        listings.expect_find_by_id().return_once(|_| Ok(None));
        let mut bookings = MockBookingRepository::new();
        bookings.expect_create().never();

        let err = service(bookings, listings, MockUserRepository::new())
            .create(request(ListingId::random(), day(3, 1), day(3, 2), 1))
            .await
            .expect_err("missing listing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn explicit_guest_must_exist() {
        let listing = fixtures::listing(UserId::random());
        let listing_id = listing.id;
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));
        let mut bookings = MockBookingRepository::new();
        bookings.expect_create().never();

        let mut req = request(listing_id, day(3, 1), day(3, 2), 1);
        req.user_id = Some(UserId::random());
        let err = service(bookings, listings_returning(listing), users)
            .create(req)
            .await
            .expect_err("missing guest");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(BookingStatus::Completed, BookingStatus::Pending)]
    #[case(BookingStatus::Completed, BookingStatus::Completed)]
    #[case(BookingStatus::Cancelled, BookingStatus::Confirmed)]
    #[case(BookingStatus::Cancelled, BookingStatus::Cancelled)]
    #[tokio::test]
    async fn terminal_bookings_never_change(
        #[case] current: BookingStatus,
        #[case] requested: BookingStatus,
    ) {
        let stored = view(current);
        let id = stored.booking.id;
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(stored)));
        bookings.expect_update_status().never();

        let err = service(bookings, MockListingRepository::new(), MockUserRepository::new())
            .update_status(&id, requested)
            .await
            .expect_err("terminal");
        assert_eq!(err.code(), ErrorCode::BusinessRuleViolation);
        assert_eq!(err.message(), "cannot update completed or cancelled bookings");
    }

    #[rstest]
    #[case(BookingStatus::Pending, BookingStatus::Confirmed)]
    #[case(BookingStatus::Confirmed, BookingStatus::Completed)]
    #[case(BookingStatus::Pending, BookingStatus::Cancelled)]
    #[tokio::test]
    async fn open_bookings_move_freely(
        #[case] current: BookingStatus,
        #[case] requested: BookingStatus,
    ) {
        let stored = view(current);
        let id = stored.booking.id;
        let mut updated = stored.booking.clone();
        updated.status = requested;
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(stored)));
        bookings
            .expect_update_status()
            .withf(move |_, status| *status == requested)
            .return_once(move |_, _| Ok(Some(updated)));

        let booking = service(bookings, MockListingRepository::new(), MockUserRepository::new())
            .update_status(&id, requested)
            .await
            .expect("transition allowed");
        assert_eq!(booking.status, requested);
    }
}

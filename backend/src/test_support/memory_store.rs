//! In-memory implementation of every repository port.
//!
//! Mirrors the Diesel adapters closely enough for end-to-end HTTP tests:
//! newest-first ordering, page slicing, counts and recent-activity excerpts.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    BookingPersistenceError, BookingRepository, ListingPersistenceError, ListingRepository,
    UserCredentialRecord, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Booking, BookingFilter, BookingId, BookingListingExcerpt, BookingStatus, BookingView, Email,
    GuestBookingExcerpt, HostedListingExcerpt, Listing, ListingBookingExcerpt, ListingChanges,
    ListingDetail, ListingFilter, ListingId, ListingView, NewBooking, NewListing, User,
    UserChanges, UserDetail, UserId, UserRef, UserSummary,
};

#[derive(Default)]
struct State {
    users: Vec<(User, String)>,
    listings: Vec<Listing>,
    bookings: Vec<Booking>,
    unavailable: bool,
}

/// Shared in-memory store; cheap to clone.
#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryStore {
    /// Empty store stamping writes with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            clock,
        }
    }

    /// Seed a user with a stored password hash.
    pub fn insert_user(&self, user: User, password_hash: impl Into<String>) {
        self.lock().users.push((user, password_hash.into()));
    }

    /// Seed a listing.
    pub fn insert_listing(&self, listing: Listing) {
        self.lock().listings.push(listing);
    }

    /// Seed a booking.
    pub fn insert_booking(&self, booking: Booking) {
        self.lock().bookings.push(booking);
    }

    /// Make every subsequent call fail with a connection error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Snapshot of all stored bookings in insertion order.
    pub fn bookings(&self) -> Vec<Booking> {
        self.lock().bookings.clone()
    }

    /// Snapshot of a stored user.
    pub fn user(&self, id: &UserId) -> Option<User> {
        self.lock()
            .users
            .iter()
            .find(|(user, _)| user.id == *id)
            .map(|(user, _)| user.clone())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}

impl State {
    fn user_ref(&self, id: UserId) -> Option<UserRef> {
        self.users
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(user, _)| UserRef::from(user))
    }

    fn listing(&self, id: ListingId) -> Option<&Listing> {
        self.listings.iter().find(|listing| listing.id == id)
    }

    fn booking_view(&self, booking: &Booking) -> Option<BookingView> {
        let listing = self.listing(booking.listing_id)?;
        Some(BookingView {
            booking: booking.clone(),
            guest: self.user_ref(booking.user_id)?,
            listing: BookingListingExcerpt {
                id: listing.id,
                title: listing.title.clone(),
                location: listing.location.clone(),
                price_per_night: listing.price_per_night,
                max_guests: listing.max_guests,
                status: listing.status,
            },
        })
    }
}

fn newest_first<T: Clone>(items: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut sorted: Vec<T> = items.iter().rev().cloned().collect();
    sorted.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    sorted
}

fn slice<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    let items = items.into_iter().skip(offset).take(limit).collect();
    Page::new(items, page, total)
}

fn recent(limit: u32) -> usize {
    usize::try_from(limit).unwrap_or(usize::MAX)
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock();
        if state.unavailable {
            return Err(UserPersistenceError::connection("store offline"));
        }
        Ok(state
            .users
            .iter()
            .find(|(user, _)| user.id == *id)
            .map(|(user, _)| user.clone()))
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentialRecord>, UserPersistenceError> {
        let state = self.lock();
        if state.unavailable {
            return Err(UserPersistenceError::connection("store offline"));
        }
        Ok(state
            .users
            .iter()
            .find(|(user, _)| user.email == *email)
            .map(|(user, hash)| UserCredentialRecord {
                user: user.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<UserSummary>, UserPersistenceError> {
        let state = self.lock();
        if state.unavailable {
            return Err(UserPersistenceError::connection("store offline"));
        }
        let users: Vec<User> = state.users.iter().map(|(user, _)| user.clone()).collect();
        let summaries = newest_first(&users, |user| user.created_at)
            .into_iter()
            .map(|user| UserSummary {
                listing_count: state
                    .listings
                    .iter()
                    .filter(|listing| listing.host_id == user.id)
                    .count() as u64,
                booking_count: state
                    .bookings
                    .iter()
                    .filter(|booking| booking.user_id == user.id)
                    .count() as u64,
                user,
            })
            .collect();
        Ok(slice(summaries, page))
    }

    async fn detail(
        &self,
        id: &UserId,
        recent_limit: u32,
    ) -> Result<Option<UserDetail>, UserPersistenceError> {
        let state = self.lock();
        if state.unavailable {
            return Err(UserPersistenceError::connection("store offline"));
        }
        let Some((user, _)) = state.users.iter().find(|(user, _)| user.id == *id) else {
            return Ok(None);
        };
        let hosted: Vec<Listing> = state
            .listings
            .iter()
            .filter(|listing| listing.host_id == *id)
            .cloned()
            .collect();
        let recent_listings = newest_first(&hosted, |listing| listing.created_at)
            .into_iter()
            .take(recent(recent_limit))
            .map(|listing| HostedListingExcerpt {
                id: listing.id,
                title: listing.title,
                location: listing.location,
                status: listing.status,
                price_per_night: listing.price_per_night,
            })
            .collect();
        let own: Vec<Booking> = state
            .bookings
            .iter()
            .filter(|booking| booking.user_id == *id)
            .cloned()
            .collect();
        let recent_bookings = newest_first(&own, |booking| booking.created_at)
            .into_iter()
            .take(recent(recent_limit))
            .filter_map(|booking| {
                let listing = state.listing(booking.listing_id)?;
                Some(GuestBookingExcerpt {
                    id: booking.id,
                    check_in: booking.check_in,
                    check_out: booking.check_out,
                    status: booking.status,
                    total_price: booking.total_price,
                    listing_title: listing.title.clone(),
                    listing_location: listing.location.clone(),
                })
            })
            .collect();
        Ok(Some(UserDetail {
            user: user.clone(),
            recent_listings,
            recent_bookings,
        }))
    }

    async fn update(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let now = self.now();
        let mut state = self.lock();
        if state.unavailable {
            return Err(UserPersistenceError::connection("store offline"));
        }
        let Some((user, _)) = state.users.iter_mut().find(|(user, _)| user.id == *id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(blocked) = changes.is_blocked {
            user.is_blocked = blocked;
        }
        user.updated_at = now;
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl ListingRepository for InMemoryStore {
    async fn list(
        &self,
        filter: &ListingFilter,
        page: PageRequest,
    ) -> Result<Page<ListingView>, ListingPersistenceError> {
        let state = self.lock();
        if state.unavailable {
            return Err(ListingPersistenceError::connection("store offline"));
        }
        let matching: Vec<Listing> = state
            .listings
            .iter()
            .filter(|listing| filter.status.is_none_or(|status| listing.status == status))
            .filter(|listing| filter.host_id.is_none_or(|host| listing.host_id == host))
            .cloned()
            .collect();
        let views = newest_first(&matching, |listing| listing.created_at)
            .into_iter()
            .filter_map(|listing| {
                let host = state.user_ref(listing.host_id)?;
                let booking_count = state
                    .bookings
                    .iter()
                    .filter(|booking| booking.listing_id == listing.id)
                    .count() as u64;
                Some(ListingView {
                    listing,
                    host,
                    booking_count,
                })
            })
            .collect();
        Ok(slice(views, page))
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingPersistenceError> {
        let state = self.lock();
        if state.unavailable {
            return Err(ListingPersistenceError::connection("store offline"));
        }
        Ok(state.listing(*id).cloned())
    }

    async fn detail(
        &self,
        id: &ListingId,
        recent_limit: u32,
    ) -> Result<Option<ListingDetail>, ListingPersistenceError> {
        let state = self.lock();
        if state.unavailable {
            return Err(ListingPersistenceError::connection("store offline"));
        }
        let Some(listing) = state.listing(*id).cloned() else {
            return Ok(None);
        };
        let Some(host) = state.user_ref(listing.host_id) else {
            return Err(ListingPersistenceError::query("listing host is missing"));
        };
        let bookings: Vec<Booking> = state
            .bookings
            .iter()
            .filter(|booking| booking.listing_id == listing.id)
            .cloned()
            .collect();
        let recent_bookings = newest_first(&bookings, |booking| booking.created_at)
            .into_iter()
            .take(recent(recent_limit))
            .filter_map(|booking| {
                Some(ListingBookingExcerpt {
                    guest: state.user_ref(booking.user_id)?,
                    id: booking.id,
                    check_in: booking.check_in,
                    check_out: booking.check_out,
                    status: booking.status,
                    total_price: booking.total_price,
                })
            })
            .collect();
        Ok(Some(ListingDetail {
            listing,
            host,
            recent_bookings,
        }))
    }

    async fn create(&self, listing: &NewListing) -> Result<Listing, ListingPersistenceError> {
        let now = self.now();
        let mut state = self.lock();
        if state.unavailable {
            return Err(ListingPersistenceError::connection("store offline"));
        }
        let draft = listing.draft.clone();
        let stored = Listing {
            id: ListingId::random(),
            title: draft.title,
            description: draft.description,
            location: draft.location,
            price_per_night: draft.price_per_night,
            max_guests: draft.max_guests,
            bedrooms: draft.bedrooms,
            bathrooms: draft.bathrooms,
            image_url: draft.image_url,
            status: draft.status,
            host_id: listing.host_id,
            created_at: now,
            updated_at: now,
        };
        state.listings.push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: &ListingId,
        changes: &ListingChanges,
    ) -> Result<Option<Listing>, ListingPersistenceError> {
        let now = self.now();
        let mut state = self.lock();
        if state.unavailable {
            return Err(ListingPersistenceError::connection("store offline"));
        }
        let Some(listing) = state.listings.iter_mut().find(|listing| listing.id == *id) else {
            return Ok(None);
        };
        let changes = changes.clone();
        if let Some(title) = changes.title {
            listing.title = title;
        }
        if let Some(description) = changes.description {
            listing.description = description;
        }
        if let Some(location) = changes.location {
            listing.location = location;
        }
        if let Some(price) = changes.price_per_night {
            listing.price_per_night = price;
        }
        if let Some(max_guests) = changes.max_guests {
            listing.max_guests = max_guests;
        }
        if let Some(bedrooms) = changes.bedrooms {
            listing.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = changes.bathrooms {
            listing.bathrooms = bathrooms;
        }
        if let Some(image_url) = changes.image_url {
            listing.image_url = image_url;
        }
        if let Some(status) = changes.status {
            listing.status = status;
        }
        listing.updated_at = now;
        Ok(Some(listing.clone()))
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn list(
        &self,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> Result<Page<BookingView>, BookingPersistenceError> {
        let state = self.lock();
        if state.unavailable {
            return Err(BookingPersistenceError::connection("store offline"));
        }
        let matching: Vec<Booking> = state
            .bookings
            .iter()
            .filter(|booking| filter.status.is_none_or(|status| booking.status == status))
            .filter(|booking| filter.user_id.is_none_or(|user| booking.user_id == user))
            .filter(|booking| {
                filter
                    .listing_id
                    .is_none_or(|listing| booking.listing_id == listing)
            })
            .cloned()
            .collect();
        let views = newest_first(&matching, |booking| booking.created_at)
            .iter()
            .filter_map(|booking| state.booking_view(booking))
            .collect();
        Ok(slice(views, page))
    }

    async fn find_by_id(
        &self,
        id: &BookingId,
    ) -> Result<Option<BookingView>, BookingPersistenceError> {
        let state = self.lock();
        if state.unavailable {
            return Err(BookingPersistenceError::connection("store offline"));
        }
        Ok(state
            .bookings
            .iter()
            .find(|booking| booking.id == *id)
            .and_then(|booking| state.booking_view(booking)))
    }

    async fn create(&self, booking: &NewBooking) -> Result<Booking, BookingPersistenceError> {
        let now = self.now();
        let mut state = self.lock();
        if state.unavailable {
            return Err(BookingPersistenceError::connection("store offline"));
        }
        let stored = Booking {
            id: BookingId::random(),
            check_in: booking.check_in,
            check_out: booking.check_out,
            total_price: booking.total_price,
            guests: booking.guests,
            status: BookingStatus::Pending,
            user_id: booking.user_id,
            listing_id: booking.listing_id,
            created_at: now,
            updated_at: now,
        };
        state.bookings.push(stored.clone());
        Ok(stored)
    }

    async fn update_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingPersistenceError> {
        let now = self.now();
        let mut state = self.lock();
        if state.unavailable {
            return Err(BookingPersistenceError::connection("store offline"));
        }
        let Some(booking) = state.bookings.iter_mut().find(|booking| booking.id == *id) else {
            return Ok(None);
        };
        booking.status = status;
        booking.updated_at = now;
        Ok(Some(booking.clone()))
    }
}

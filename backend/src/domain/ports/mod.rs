//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by
//! outbound adapters. Driving ports (`*Query`, `*Command`, [`LoginService`],
//! [`SessionGate`]) are implemented by domain services and called by the
//! HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod booking_repository;
mod bookings_command;
mod bookings_query;
mod listing_repository;
mod listings_command;
mod listings_query;
mod login_service;
mod password_hasher;
mod session_gate;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingPersistenceError, BookingRepository};
#[cfg(test)]
pub use bookings_command::MockBookingsCommand;
pub use bookings_command::{BookingsCommand, CreateBookingRequest};
#[cfg(test)]
pub use bookings_query::MockBookingsQuery;
pub use bookings_query::BookingsQuery;
#[cfg(test)]
pub use listing_repository::MockListingRepository;
pub use listing_repository::{ListingPersistenceError, ListingRepository};
#[cfg(test)]
pub use listings_command::MockListingsCommand;
pub use listings_command::{CreateListingRequest, ListingsCommand};
#[cfg(test)]
pub use listings_query::MockListingsQuery;
pub use listings_query::ListingsQuery;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{LoginOutcome, LoginService};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use session_gate::MockSessionGate;
pub use session_gate::{AccessDecision, DenyReason, SessionGate};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserCredentialRecord, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;

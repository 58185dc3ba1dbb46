//! PostgreSQL persistence adapters built on Diesel and `diesel-async`.
//!
//! Repositories translate between row structs (`models`) and domain types and
//! map failures into the ports' persistence errors. No rules live here.
//!
//! ```no_run
//! use std::sync::Arc;
//! use mockable::DefaultClock;
//! use rental_admin::outbound::persistence::{DbPool, DieselListingRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/rentals")).await?;
//! let _listings = DieselListingRepository::new(pool, Arc::new(DefaultClock));
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_booking_repository;
mod diesel_listing_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod query_helpers;
mod schema;

pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_listing_repository::DieselListingRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

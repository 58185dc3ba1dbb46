//! Outbound adapters implementing the domain's driven ports.
//!
//! - [`persistence`]: PostgreSQL repositories using Diesel.
//! - [`security`]: Argon2id password hashing.

pub mod persistence;
pub mod security;

//! Rental platform administration backend.
//!
//! Hexagonal layout: [`domain`] holds entities, lifecycle rules and services;
//! [`inbound::http`] drives them over REST; [`outbound`] implements the
//! persistence and password-hashing ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

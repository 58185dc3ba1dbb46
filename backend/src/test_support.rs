//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature, which the
//! crate enables on itself as a dev-dependency.

pub mod clock;
pub mod fixtures;
pub mod memory_store;
pub mod plain_hasher;

pub use clock::MutableClock;
pub use memory_store::InMemoryStore;
pub use plain_hasher::PlainTextHasher;

//! Driving port for reading users.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, User, UserDetail, UserId, UserSummary};

/// Read side of user administration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Page through users, newest first, with activity counters.
    async fn list(&self, page: PageRequest) -> Result<Page<UserSummary>, Error>;

    /// Fetch one user without activity; `not_found` if absent.
    async fn find(&self, id: &UserId) -> Result<User, Error>;

    /// Fetch one user with recent listings and bookings; `not_found` if absent.
    async fn detail(&self, id: &UserId) -> Result<UserDetail, Error>;
}

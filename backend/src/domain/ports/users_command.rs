//! Driving port for changing users.

use async_trait::async_trait;

use crate::domain::{Error, User, UserChanges, UserId};

/// Write side of user administration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Rename and/or (un)block a user.
    ///
    /// Blocking an administrator is refused with a business rule violation.
    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, Error>;
}

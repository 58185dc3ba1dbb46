//! User administration use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::lifecycle::can_apply_user_update;
use crate::domain::ports::{UserRepository, UsersCommand, UsersQuery};
use crate::domain::{
    Error, RECENT_ACTIVITY_LIMIT, User, UserChanges, UserDetail, UserId, UserSummary,
};

fn user_not_found() -> Error {
    Error::not_found("user not found")
}

/// Implements [`UsersQuery`] and [`UsersCommand`] over a [`UserRepository`].
#[derive(Clone)]
pub struct UserAdminService<U> {
    users: Arc<U>,
}

impl<U> UserAdminService<U> {
    /// Create the service.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> UsersQuery for UserAdminService<U>
where
    U: UserRepository,
{
    async fn list(&self, page: PageRequest) -> Result<Page<UserSummary>, Error> {
        Ok(self.users.list(page).await?)
    }

    async fn find(&self, id: &UserId) -> Result<User, Error> {
        self.users.find_by_id(id).await?.ok_or_else(user_not_found)
    }

    async fn detail(&self, id: &UserId) -> Result<UserDetail, Error> {
        self.users
            .detail(id, RECENT_ACTIVITY_LIMIT)
            .await?
            .ok_or_else(user_not_found)
    }
}

#[async_trait]
impl<U> UsersCommand for UserAdminService<U>
where
    U: UserRepository,
{
    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(user_not_found)?;

        can_apply_user_update(existing.role, changes.is_blocked).map_err(|violation| {
            tracing::info!(user_id = %id, code = violation.code(), "user update refused");
            Error::from(violation)
        })?;

        if changes.is_empty() {
            return Ok(existing);
        }

        let updated = self
            .users
            .update(id, &changes)
            .await?
            .ok_or_else(user_not_found)?;
        tracing::info!(user_id = %id, blocked = updated.is_blocked, "user updated");
        Ok(updated)
    }
}

//! Driven port for user persistence.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, Email, User, UserChanges, UserDetail, UserId, UserSummary};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

impl From<UserPersistenceError> for Error {
    fn from(error: UserPersistenceError) -> Self {
        match error {
            UserPersistenceError::Connection { message } => {
                Self::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Self::internal(format!("user repository error: {message}"))
            }
        }
    }
}

/// A user together with the stored password hash, used only for login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentialRecord {
    pub user: User,
    pub password_hash: String,
}

/// User storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user and password hash by normalised email.
    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentialRecord>, UserPersistenceError>;

    /// Page through users, newest first, with listing and booking counts.
    async fn list(&self, page: PageRequest) -> Result<Page<UserSummary>, UserPersistenceError>;

    /// Fetch a user with up to `recent` of their newest listings and bookings.
    async fn detail(
        &self,
        id: &UserId,
        recent: u32,
    ) -> Result<Option<UserDetail>, UserPersistenceError>;

    /// Apply `changes`, returning the updated user or `None` when absent.
    async fn update(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserPersistenceError>;
}

//! Driven port for user and user-type endpoints.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use super::{ApiError, MutationAck};
use crate::domain::{AuthToken, EntityId, NewUser, User, UserFilter, UserType, UserUpdate};

/// User endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// One page of users.
    async fn list_users(&self, token: &AuthToken, page: PageRequest)
    -> Result<Page<User>, ApiError>;

    /// Every user, unpaginated.
    async fn all_users(&self, token: &AuthToken) -> Result<Vec<User>, ApiError>;

    /// Users matching every field of `filter`.
    async fn users_by_field(
        &self,
        token: &AuthToken,
        filter: &UserFilter,
    ) -> Result<Vec<User>, ApiError>;

    /// Self-service registration; sent without a token.
    async fn register(&self, user: &NewUser) -> Result<MutationAck, ApiError>;

    /// Account created by a signed-in administrator.
    async fn create_user(&self, token: &AuthToken, user: &NewUser)
    -> Result<MutationAck, ApiError>;

    /// Apply a partial update.
    async fn update_user(
        &self,
        token: &AuthToken,
        id: &EntityId,
        update: &UserUpdate,
    ) -> Result<MutationAck, ApiError>;

    /// Delete a user.
    async fn delete_user(&self, token: &AuthToken, id: &EntityId)
    -> Result<MutationAck, ApiError>;

    /// User-type lookup.
    async fn list_user_types(&self, token: &AuthToken) -> Result<Vec<UserType>, ApiError>;
}

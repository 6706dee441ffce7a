//! Driven port for product-to-user mapping endpoints.

use async_trait::async_trait;

use super::{ApiError, MutationAck};
use crate::domain::{AuthToken, EntityId, MappedProduct, NewMapping};

/// Mapping endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingsApi: Send + Sync {
    /// Every mapping.
    async fn list_mappings(&self, token: &AuthToken) -> Result<Vec<MappedProduct>, ApiError>;

    /// Assign a product to a user.
    async fn create_mapping(
        &self,
        token: &AuthToken,
        mapping: &NewMapping,
    ) -> Result<MutationAck, ApiError>;

    /// Remove an assignment.
    async fn delete_mapping(&self, token: &AuthToken, id: &EntityId)
    -> Result<MutationAck, ApiError>;
}

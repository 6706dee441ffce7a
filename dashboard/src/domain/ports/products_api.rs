//! Driven port for demo product endpoints.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use super::{ApiError, MutationAck};
use crate::domain::{AuthToken, DemoProduct, EntityId, ProductUpdate};

/// Demo product endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductsApi: Send + Sync {
    /// One page of products.
    async fn list_products(
        &self,
        token: &AuthToken,
        page: PageRequest,
    ) -> Result<Page<DemoProduct>, ApiError>;

    /// One product.
    async fn product(&self, token: &AuthToken, id: &EntityId) -> Result<DemoProduct, ApiError>;

    /// Edit a product.
    async fn update_product(
        &self,
        token: &AuthToken,
        id: &EntityId,
        update: &ProductUpdate,
    ) -> Result<MutationAck, ApiError>;

    /// Delete a product.
    async fn delete_product(&self, token: &AuthToken, id: &EntityId)
    -> Result<MutationAck, ApiError>;
}

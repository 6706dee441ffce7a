//! Driven port for region, country and city endpoints.

use async_trait::async_trait;

use super::{ApiError, MutationAck};
use crate::domain::{
    AuthToken, City, Country, CountryUpdate, EntityId, NewCity, NewCountry, NewRegion, Region,
    RegionUpdate,
};

/// Geographic hierarchy endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeographyApi: Send + Sync {
    /// Every region.
    async fn list_regions(&self, token: &AuthToken) -> Result<Vec<Region>, ApiError>;

    /// Create a region.
    async fn create_region(
        &self,
        token: &AuthToken,
        region: &NewRegion,
    ) -> Result<MutationAck, ApiError>;

    /// Update a region.
    async fn update_region(
        &self,
        token: &AuthToken,
        id: &EntityId,
        update: &RegionUpdate,
    ) -> Result<MutationAck, ApiError>;

    /// Delete a region.
    async fn delete_region(&self, token: &AuthToken, id: &EntityId)
    -> Result<MutationAck, ApiError>;

    /// Countries of `region`.
    async fn list_countries(
        &self,
        token: &AuthToken,
        region: &EntityId,
    ) -> Result<Vec<Country>, ApiError>;

    /// Create a country.
    async fn create_country(
        &self,
        token: &AuthToken,
        country: &NewCountry,
    ) -> Result<MutationAck, ApiError>;

    /// Update or move a country.
    async fn update_country(
        &self,
        token: &AuthToken,
        id: &EntityId,
        update: &CountryUpdate,
    ) -> Result<MutationAck, ApiError>;

    /// Cities of `country`.
    async fn list_cities(&self, token: &AuthToken, country: &EntityId)
    -> Result<Vec<City>, ApiError>;

    /// Create a city.
    async fn create_city(&self, token: &AuthToken, city: &NewCity)
    -> Result<MutationAck, ApiError>;
}

//! Domain ports for the hexagonal boundary.
//!
//! Each backend API module is a driven port. Outbound adapters implement them
//! over HTTP; the test-support backend implements them in memory.

mod macros;
pub(crate) use macros::define_port_error;

mod api_error;
mod auth_api;
mod geography_api;
mod mappings_api;
mod organization_api;
mod products_api;
mod session_store;
mod users_api;

pub use api_error::ApiError;
#[cfg(test)]
pub use auth_api::MockAuthApi;
pub use auth_api::{AuthApi, VerifiedEmail};
#[cfg(test)]
pub use geography_api::MockGeographyApi;
pub use geography_api::GeographyApi;
#[cfg(test)]
pub use mappings_api::MockMappingsApi;
pub use mappings_api::MappingsApi;
#[cfg(test)]
pub use organization_api::MockOrganizationApi;
pub use organization_api::OrganizationApi;
#[cfg(test)]
pub use products_api::MockProductsApi;
pub use products_api::ProductsApi;
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{NoSessionStore, SessionStore, SessionStoreError};
#[cfg(test)]
pub use users_api::MockUsersApi;
pub use users_api::UsersApi;

/// Server acknowledgement of a write.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MutationAck {
    /// Notification text returned by the backend.
    pub message: String,
}

impl MutationAck {
    /// Acknowledgement carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Every backend API port; implemented automatically.
pub trait DashboardApi:
    AuthApi + UsersApi + GeographyApi + OrganizationApi + ProductsApi + MappingsApi
{
}

impl<T> DashboardApi for T where
    T: AuthApi + UsersApi + GeographyApi + OrganizationApi + ProductsApi + MappingsApi
{
}

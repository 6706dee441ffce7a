//! Driven port for department and designation endpoints.

use async_trait::async_trait;

use super::{ApiError, MutationAck};
use crate::domain::{AuthToken, ImportFile, NewOrgUnit, OrgUnit, OrgUnitKind};

/// Department and designation endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationApi: Send + Sync {
    /// Entries of one list.
    async fn list_org_units(
        &self,
        token: &AuthToken,
        kind: OrgUnitKind,
    ) -> Result<Vec<OrgUnit>, ApiError>;

    /// Add one entry.
    async fn add_org_unit(&self, token: &AuthToken, unit: &NewOrgUnit)
    -> Result<MutationAck, ApiError>;

    /// Forward a spreadsheet to the bulk import endpoint.
    async fn import_org_units(
        &self,
        token: &AuthToken,
        kind: OrgUnitKind,
        file: &ImportFile,
    ) -> Result<MutationAck, ApiError>;
}

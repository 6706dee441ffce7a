//! Writes. Each one validates locally, sends one request and, on success,
//! invalidates the tags its [`Mutation`] names.

use std::fmt::Display;

use tracing::info;

use super::Dashboard;
use crate::domain::ports::{
    DashboardApi, GeographyApi, MappingsApi, MutationAck, OrganizationApi, ProductsApi, UsersApi,
};
use crate::domain::{
    CountryUpdate, EntityId, Error, ImportFile, Mutation, NewCity, NewCountry, NewMapping,
    NewOrgUnit, NewRegion, OrgUnitKind, ProductUpdate, QueryData, RegionUpdate, RegistrationForm,
    RegistrationOrigin, Session, UserUpdate,
};

fn invalid(error: impl Display) -> Error {
    Error::invalid_request(error.to_string())
}

impl<B: DashboardApi> Dashboard<B> {
    /// Self-service sign up. The account stays inactive until approved.
    ///
    /// No session exists yet, so matching cached lists are only marked
    /// stale.
    pub async fn register(&self, form: RegistrationForm) -> Result<MutationAck, Error> {
        let user = form.validate(RegistrationOrigin::SelfService).map_err(invalid)?;
        let ack = self.backend.register(&user).await.map_err(Error::from)?;
        info!(mutation = Mutation::CreateUser.name(), "registration submitted");
        self.cache.invalidate(&Mutation::CreateUser.invalidated_tags());
        Ok(ack)
    }

    /// Create an active account on behalf of an administrator.
    pub async fn create_user(
        &self,
        session: &Session,
        form: RegistrationForm,
    ) -> Result<MutationAck, Error> {
        let user = form.validate(RegistrationOrigin::Administrator).map_err(invalid)?;
        let outcome = self.backend.create_user(session.token(), &user).await;
        self.commit(session, Mutation::CreateUser, outcome).await
    }

    /// Patch a user.
    pub async fn update_user(
        &self,
        session: &Session,
        id: &EntityId,
        update: &UserUpdate,
    ) -> Result<MutationAck, Error> {
        update.validate().map_err(invalid)?;
        let outcome = self.backend.update_user(session.token(), id, update).await;
        self.commit(session, Mutation::UpdateUser { id: id.clone() }, outcome)
            .await
    }

    /// Activate or deactivate a user.
    pub async fn set_user_active(
        &self,
        session: &Session,
        id: &EntityId,
        active: bool,
    ) -> Result<MutationAck, Error> {
        self.update_user(session, id, &UserUpdate::activation(active))
            .await
    }

    /// Approve or reject a pending registration.
    pub async fn set_user_approval(
        &self,
        session: &Session,
        id: &EntityId,
        approved: bool,
    ) -> Result<MutationAck, Error> {
        self.update_user(session, id, &UserUpdate::approval(approved))
            .await
    }

    /// Delete a user.
    pub async fn delete_user(&self, session: &Session, id: &EntityId) -> Result<MutationAck, Error> {
        let outcome = self.backend.delete_user(session.token(), id).await;
        self.commit(session, Mutation::DeleteUser { id: id.clone() }, outcome)
            .await
    }

    /// Create a region.
    pub async fn create_region(
        &self,
        session: &Session,
        region: &NewRegion,
    ) -> Result<MutationAck, Error> {
        let outcome = self.backend.create_region(session.token(), region).await;
        self.commit(session, Mutation::CreateRegion, outcome).await
    }

    /// Rename or toggle a region.
    pub async fn update_region(
        &self,
        session: &Session,
        id: &EntityId,
        update: &RegionUpdate,
    ) -> Result<MutationAck, Error> {
        update.validate().map_err(invalid)?;
        let outcome = self.backend.update_region(session.token(), id, update).await;
        self.commit(session, Mutation::UpdateRegion { id: id.clone() }, outcome)
            .await
    }

    /// Delete a region.
    pub async fn delete_region(
        &self,
        session: &Session,
        id: &EntityId,
    ) -> Result<MutationAck, Error> {
        let outcome = self.backend.delete_region(session.token(), id).await;
        self.commit(session, Mutation::DeleteRegion { id: id.clone() }, outcome)
            .await
    }

    /// Create a country under its region.
    pub async fn create_country(
        &self,
        session: &Session,
        country: &NewCountry,
    ) -> Result<MutationAck, Error> {
        let outcome = self.backend.create_country(session.token(), country).await;
        let mutation = Mutation::CreateCountry {
            region: country.region().clone(),
        };
        self.commit(session, mutation, outcome).await
    }

    /// Update a country.
    ///
    /// When the update moves the country, both the new and the old region's
    /// country lists are invalidated. The old region is read from the cached
    /// copy of the country; if it was never loaded there is no list to
    /// refresh.
    pub async fn update_country(
        &self,
        session: &Session,
        id: &EntityId,
        update: &CountryUpdate,
    ) -> Result<MutationAck, Error> {
        update.validate().map_err(invalid)?;
        let previous_region = self.cached_country_region(id);
        let outcome = self.backend.update_country(session.token(), id, update).await;
        let mutation = Mutation::UpdateCountry {
            id: id.clone(),
            previous_region,
            new_region: update.region.clone(),
        };
        self.commit(session, mutation, outcome).await
    }

    fn cached_country_region(&self, id: &EntityId) -> Option<EntityId> {
        self.cache.find_cached(|data| match data {
            QueryData::Countries(countries) => countries
                .iter()
                .find(|country| &country.id == id)
                .map(|country| country.region.id().clone()),
            _ => None,
        })
    }

    /// Create a city under its country.
    pub async fn create_city(&self, session: &Session, city: &NewCity) -> Result<MutationAck, Error> {
        let outcome = self.backend.create_city(session.token(), city).await;
        let mutation = Mutation::CreateCity {
            country: city.country().clone(),
        };
        self.commit(session, mutation, outcome).await
    }

    /// Add one department or designation.
    pub async fn add_org_unit(
        &self,
        session: &Session,
        unit: &NewOrgUnit,
    ) -> Result<MutationAck, Error> {
        let outcome = self.backend.add_org_unit(session.token(), unit).await;
        self.commit(session, Mutation::ChangeOrgUnits(unit.kind()), outcome)
            .await
    }

    /// Forward a spreadsheet of departments or designations for import.
    pub async fn import_org_units(
        &self,
        session: &Session,
        kind: OrgUnitKind,
        file: &ImportFile,
    ) -> Result<MutationAck, Error> {
        let outcome = self
            .backend
            .import_org_units(session.token(), kind, file)
            .await;
        self.commit(session, Mutation::ChangeOrgUnits(kind), outcome)
            .await
    }

    /// Edit a demo product.
    pub async fn update_product(
        &self,
        session: &Session,
        id: &EntityId,
        update: &ProductUpdate,
    ) -> Result<MutationAck, Error> {
        update.validate().map_err(invalid)?;
        let outcome = self.backend.update_product(session.token(), id, update).await;
        self.commit(session, Mutation::UpdateProduct { id: id.clone() }, outcome)
            .await
    }

    /// Delete a demo product.
    pub async fn delete_product(
        &self,
        session: &Session,
        id: &EntityId,
    ) -> Result<MutationAck, Error> {
        let outcome = self.backend.delete_product(session.token(), id).await;
        self.commit(session, Mutation::DeleteProduct { id: id.clone() }, outcome)
            .await
    }

    /// Assign one product to one user.
    pub async fn create_mapping(
        &self,
        session: &Session,
        mapping: &NewMapping,
    ) -> Result<MutationAck, Error> {
        let outcome = self.backend.create_mapping(session.token(), mapping).await;
        self.commit(session, Mutation::CreateMapping, outcome).await
    }

    /// Remove an assignment.
    pub async fn delete_mapping(
        &self,
        session: &Session,
        id: &EntityId,
    ) -> Result<MutationAck, Error> {
        let outcome = self.backend.delete_mapping(session.token(), id).await;
        self.commit(session, Mutation::DeleteMapping, outcome).await
    }
}

//! Cached reads.

use pagination::{Page, PageRequest};

use super::Dashboard;
use crate::domain::ports::DashboardApi;
use crate::domain::{
    City, Country, DemoProduct, EntityId, Error, INCOMPLETE_FILTERS, MappedProduct, OrgUnit,
    QueryKey, Region, SelectionState, Session, User, UserType,
};

impl<B: DashboardApi> Dashboard<B> {
    /// One page of users.
    pub async fn users(&self, session: &Session, page: PageRequest) -> Result<Page<User>, Error> {
        self.read(session, QueryKey::Users(page)).await
    }

    /// Every user, unpaginated.
    pub async fn all_users(&self, session: &Session) -> Result<Vec<User>, Error> {
        self.read(session, QueryKey::AllUsers).await
    }

    /// User-type lookup.
    pub async fn user_types(&self, session: &Session) -> Result<Vec<UserType>, Error> {
        self.read(session, QueryKey::UserTypes).await
    }

    /// Every region.
    pub async fn regions(&self, session: &Session) -> Result<Vec<Region>, Error> {
        self.read(session, QueryKey::Regions).await
    }

    /// Countries of `region`.
    pub async fn countries(
        &self,
        session: &Session,
        region: &EntityId,
    ) -> Result<Vec<Country>, Error> {
        self.read(
            session,
            QueryKey::Countries {
                region: region.clone(),
            },
        )
        .await
    }

    /// Countries of the selected region; no request while no region is
    /// selected.
    pub async fn selected_countries(
        &self,
        session: &Session,
        selection: &SelectionState,
    ) -> Result<Option<Vec<Country>>, Error> {
        match selection.region() {
            Some(region) => self.countries(session, region).await.map(Some),
            None => Ok(None),
        }
    }

    /// Cities of `country`.
    pub async fn cities(&self, session: &Session, country: &EntityId) -> Result<Vec<City>, Error> {
        self.read(
            session,
            QueryKey::Cities {
                country: country.clone(),
            },
        )
        .await
    }

    /// Department lookup.
    pub async fn departments(&self, session: &Session) -> Result<Vec<OrgUnit>, Error> {
        self.read(session, QueryKey::Departments).await
    }

    /// Designation lookup.
    pub async fn designations(&self, session: &Session) -> Result<Vec<OrgUnit>, Error> {
        self.read(session, QueryKey::Designations).await
    }

    /// One page of demo products.
    pub async fn products(
        &self,
        session: &Session,
        page: PageRequest,
    ) -> Result<Page<DemoProduct>, Error> {
        self.read(session, QueryKey::Products(page)).await
    }

    /// One demo product.
    pub async fn product(&self, session: &Session, id: &EntityId) -> Result<DemoProduct, Error> {
        self.read(session, QueryKey::Product(id.clone())).await
    }

    /// Every product-to-user mapping.
    pub async fn mappings(&self, session: &Session) -> Result<Vec<MappedProduct>, Error> {
        self.read(session, QueryKey::Mappings).await
    }

    /// Run the explicit "Filter Users" action.
    ///
    /// All four filters must be set; otherwise no request is issued and an
    /// invalid-request error carrying the missing fields is returned. A
    /// successful run always refetches and records the applied filter.
    pub async fn filter_users(
        &self,
        session: &Session,
        selection: &mut SelectionState,
    ) -> Result<Vec<User>, Error> {
        let filter = selection.filter_criteria().map_err(|incomplete| {
            Error::invalid_request(INCOMPLETE_FILTERS)
                .with_details(serde_json::json!({ "missing": incomplete.missing }))
        })?;
        let key = QueryKey::FilteredUsers(filter.clone());
        self.cache.mark_stale(&key);
        let users = self.read(session, key).await?;
        selection.mark_applied(filter);
        Ok(users)
    }
}

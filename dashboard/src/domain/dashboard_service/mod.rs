//! Dashboard service: cached reads, invalidating writes and auth flows.
//!
//! Every operation that talks to the backend takes the caller's
//! [`Session`]; nothing reads an ambient token. Reads go through the shared
//! [`QueryCache`]; writes invalidate tags through the [`Mutation`] graph and
//! refetch the affected queries that still have subscribers.

mod assign;
mod auth;
mod reads;
mod writes;

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    ApiError, DashboardApi, GeographyApi, MappingsApi, MutationAck, NoSessionStore,
    OrganizationApi, ProductsApi, SessionStore, UsersApi,
};
use crate::domain::{
    AuthToken, Error, FetchOutcome, Mutation, OrgUnitKind, Probe, QueryCache, QueryData,
    QueryKey, QueryPayload, QuerySnapshot, QuerySubscription, Session,
};

/// Client data layer over a backend implementing every API port.
pub struct Dashboard<B> {
    backend: Arc<B>,
    cache: Arc<QueryCache>,
    sessions: Arc<dyn SessionStore>,
}

impl<B> Clone for Dashboard<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            cache: Arc::clone(&self.cache),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<B> Dashboard<B> {
    /// Create a dashboard with an empty cache and no session persistence.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            cache: Arc::new(QueryCache::new()),
            sessions: Arc::new(NoSessionStore),
        }
    }

    /// Persist sessions through `store`.
    #[must_use]
    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.sessions = store;
        self
    }

    /// Shared query cache.
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Backend the dashboard talks to.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Keep `key` refreshed after invalidations while the subscription lives.
    pub fn subscribe(&self, key: QueryKey) -> QuerySubscription {
        self.cache.subscribe(key)
    }

    /// Current cache state of `key`.
    pub fn snapshot(&self, key: &QueryKey) -> QuerySnapshot {
        self.cache.snapshot(key)
    }
}

impl<B: DashboardApi> Dashboard<B> {
    /// Load `key` through the cache.
    ///
    /// Fresh data is returned without a request. Concurrent callers for the
    /// same key wait on one request and share its outcome. A response that
    /// arrives after its entry was invalidated is dropped and the read is
    /// retried.
    async fn load(&self, session: &Session, key: &QueryKey) -> Result<QueryData, Error> {
        loop {
            let (gate, seen) = match self.cache.probe(key) {
                Probe::Fresh(data) => return Ok(data),
                Probe::Miss { gate, settled } => (gate, settled),
            };
            let _turn = gate.lock().await;
            if let Some(shared) = self.cache.settled_since(key, seen) {
                debug!(query = key.name(), "joined in-flight request");
                return shared;
            }
            if let Some(data) = self.cache.fresh(key) {
                return Ok(data);
            }

            let flight = self.cache.begin_fetch(key);
            let result = self.fetch(session.token(), key).await;
            if let Err(error) = &result {
                warn!(query = key.name(), code = ?error.code(), error = %error, "query failed");
            }
            match flight.complete(&result) {
                FetchOutcome::Applied => return result,
                FetchOutcome::Superseded => {
                    debug!(query = key.name(), "refetching superseded query");
                }
            }
        }
    }

    async fn read<T: QueryPayload>(&self, session: &Session, key: QueryKey) -> Result<T, Error> {
        let data = self.load(session, &key).await?;
        T::from_data(data).map_err(|other| {
            Error::internal(format!(
                "query {} produced {} data",
                key.name(),
                other.variant()
            ))
        })
    }

    async fn fetch(&self, token: &AuthToken, key: &QueryKey) -> Result<QueryData, Error> {
        let backend = self.backend.as_ref();
        let result: Result<QueryData, ApiError> = match key {
            QueryKey::Users(page) => backend.list_users(token, *page).await.map(QueryData::UserPage),
            QueryKey::AllUsers => backend.all_users(token).await.map(QueryData::Users),
            QueryKey::FilteredUsers(filter) => {
                backend.users_by_field(token, filter).await.map(QueryData::Users)
            }
            QueryKey::UserTypes => backend.list_user_types(token).await.map(QueryData::UserTypes),
            QueryKey::Regions => backend.list_regions(token).await.map(QueryData::Regions),
            QueryKey::Countries { region } => backend
                .list_countries(token, region)
                .await
                .map(QueryData::Countries),
            QueryKey::Cities { country } => backend
                .list_cities(token, country)
                .await
                .map(QueryData::Cities),
            QueryKey::Departments => backend
                .list_org_units(token, OrgUnitKind::Department)
                .await
                .map(QueryData::OrgUnits),
            QueryKey::Designations => backend
                .list_org_units(token, OrgUnitKind::Designation)
                .await
                .map(QueryData::OrgUnits),
            QueryKey::Products(page) => backend
                .list_products(token, *page)
                .await
                .map(QueryData::ProductPage),
            QueryKey::Product(id) => backend.product(token, id).await.map(QueryData::Product),
            QueryKey::Mappings => backend.list_mappings(token).await.map(QueryData::Mappings),
        };
        result.map_err(Error::from)
    }

    /// Finish a write: log, invalidate and refetch subscribed queries.
    async fn commit(
        &self,
        session: &Session,
        mutation: Mutation,
        outcome: Result<MutationAck, ApiError>,
    ) -> Result<MutationAck, Error> {
        let ack = outcome.map_err(|error| {
            warn!(mutation = mutation.name(), error = %error, "mutation failed");
            Error::from(error)
        })?;
        info!(mutation = mutation.name(), "mutation applied");
        self.refresh_after(session, &mutation).await;
        Ok(ack)
    }

    async fn refresh_after(&self, session: &Session, mutation: &Mutation) {
        let keys = self.cache.invalidate(&mutation.invalidated_tags());
        let results = join_all(keys.iter().map(|key| self.load(session, key))).await;
        for (key, result) in keys.iter().zip(results) {
            if let Err(error) = result {
                warn!(query = key.name(), error = %error, "refetch after mutation failed");
            }
        }
    }
}

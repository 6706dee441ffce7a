//! In-memory backend implementing every API port.
//!
//! Records each call, applies writes to its own tables, and can be told to
//! fail an operation or to hold it until released. Holding is how tests
//! observe requests that are still in flight.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tokio::sync::Semaphore;

use super::object_id;
use crate::domain::ports::{
    ApiError, AuthApi, GeographyApi, MappingsApi, MutationAck, OrganizationApi, ProductsApi,
    UsersApi, VerifiedEmail,
};
use crate::domain::{
    ActivationChallenge, AuthToken, City, Country, CountryUpdate, DemoProduct, EmailAddress,
    EmailVerification, EntityId, ImportFile, LoginCredentials, LoginResponse, MappedProduct,
    NewCity, NewCountry, NewMapping, NewOrgUnit, NewRegion, NewUser, OrgUnit, OrgUnitKind,
    PasswordReset, ProductUpdate, Reference, Region, RegionUpdate, Role, User, UserFilter,
    UserType, UserUpdate,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    passwords: HashMap<String, String>,
    user_types: Vec<UserType>,
    regions: Vec<Region>,
    countries: Vec<Country>,
    cities: Vec<City>,
    departments: Vec<OrgUnit>,
    designations: Vec<OrgUnit>,
    products: Vec<DemoProduct>,
    mappings: Vec<MappedProduct>,
    next_id: u64,
    calls: Vec<String>,
    failures: HashMap<&'static str, ApiError>,
    failing_mappings: HashMap<EntityId, ApiError>,
    holds: HashMap<&'static str, Arc<Semaphore>>,
}

impl Tables {
    fn issue_id(&mut self) -> EntityId {
        self.next_id += 1;
        object_id(self.next_id)
    }

    fn user_type_ref(&self, id: &EntityId) -> Reference {
        self.user_types
            .iter()
            .find(|user_type| &user_type.id == id)
            .map_or_else(
                || Reference::new(id.clone()),
                |user_type| Reference::named(id.clone(), user_type.type_name.clone()),
            )
    }

    fn region_ref(&self, id: &EntityId) -> Reference {
        self.regions
            .iter()
            .find(|region| &region.id == id)
            .map_or_else(
                || Reference::new(id.clone()),
                |region| Reference::named(id.clone(), region.name.clone()),
            )
    }

    fn country_ref(&self, id: &EntityId) -> Reference {
        self.countries
            .iter()
            .find(|country| &country.id == id)
            .map_or_else(
                || Reference::new(id.clone()),
                |country| Reference::named(id.clone(), country.name.clone()),
            )
    }

    fn org_units(&mut self, kind: OrgUnitKind) -> &mut Vec<OrgUnit> {
        match kind {
            OrgUnitKind::Department => &mut self.departments,
            OrgUnitKind::Designation => &mut self.designations,
        }
    }

    fn insert_user(&mut self, user: &NewUser) -> User {
        let id = self.issue_id();
        let record = User {
            id,
            ses_id: user.ses_id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            is_active: user.is_active,
            is_approved: user.is_approved,
            department: user.department.clone(),
            designation: user.designation.clone(),
            region: Some(self.region_ref(&user.region)),
            country: Some(self.country_ref(&user.country)),
            user_type: Some(self.user_type_ref(&user.user_type)),
            created_at: None,
        };
        self.passwords
            .insert(user.ses_id.clone(), user.password.as_str().to_owned());
        self.users.push(record.clone());
        record
    }
}

fn missing(kind: &str, id: &EntityId) -> ApiError {
    ApiError::not_found(format!("{kind} {id} not found"))
}

/// Backend double holding every table in memory.
pub struct InMemoryBackend {
    tables: Mutex<Tables>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Empty backend with the three standard user types.
    pub fn new() -> Self {
        let mut tables = Tables::default();
        let user_types: Vec<UserType> = Role::ALL
            .into_iter()
            .map(|role| UserType {
                id: tables.issue_id(),
                type_name: role.as_str().to_owned(),
            })
            .collect();
        tables.user_types = user_types;
        Self {
            tables: Mutex::new(tables),
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `op`, wait while it is held and report any injected failure.
    async fn enter(&self, op: &'static str, detail: Option<&str>) -> Result<(), ApiError> {
        let (failure, hold) = {
            let mut tables = self.tables();
            tables.calls.push(detail.map_or_else(
                || op.to_owned(),
                |detail| format!("{op}({detail})"),
            ));
            (tables.failures.get(op).cloned(), tables.holds.get(op).cloned())
        };
        if let Some(hold) = hold {
            // Closing the semaphore releases every waiter.
            let _released = hold.acquire().await;
        }
        failure.map_or(Ok(()), Err)
    }

    // --- seeding ---------------------------------------------------------

    /// Id of the user type for `role`.
    ///
    /// # Panics
    ///
    /// Never for the standard roles seeded by [`InMemoryBackend::new`].
    pub fn user_type_id(&self, role: Role) -> EntityId {
        let tables = self.tables();
        match tables
            .user_types
            .iter()
            .find(|user_type| user_type.role() == Some(role))
        {
            Some(user_type) => user_type.id.clone(),
            None => panic!("user type for {role:?} missing"),
        }
    }

    /// Add a region and return its id.
    pub fn seed_region(&self, name: &str, is_active: bool) -> EntityId {
        let mut tables = self.tables();
        let id = tables.issue_id();
        tables.regions.push(Region {
            id: id.clone(),
            name: name.to_owned(),
            is_active,
            created_at: None,
            total_countries: None,
            total_cities: None,
        });
        id
    }

    /// Add a country under `region` and return its id.
    pub fn seed_country(&self, region: &EntityId, name: &str) -> EntityId {
        let mut tables = self.tables();
        let id = tables.issue_id();
        let region = tables.region_ref(region);
        tables.countries.push(Country {
            id: id.clone(),
            name: name.to_owned(),
            code: None,
            region,
            is_active: true,
            created_at: None,
        });
        id
    }

    /// Add a demo product and return its id.
    pub fn seed_product(&self, title: &str) -> EntityId {
        let mut tables = self.tables();
        let id = tables.issue_id();
        tables.products.push(DemoProduct {
            id: id.clone(),
            title: title.to_owned(),
            description: String::new(),
            image_url: None,
            video_url: None,
            category: None,
            created_at: None,
        });
        id
    }

    /// Add a department or designation.
    pub fn seed_org_unit(&self, kind: OrgUnitKind, name: &str) {
        let mut tables = self.tables();
        let id = tables.issue_id();
        tables.org_units(kind).push(OrgUnit {
            id,
            name: name.to_owned(),
        });
    }

    /// Add an account that can log in with `password`.
    pub fn seed_account(&self, user: &NewUser) -> User {
        self.tables().insert_user(user)
    }

    // --- failure and hold injection --------------------------------------

    /// Fail every call to `op` with `error` until [`InMemoryBackend::recover`].
    pub fn fail(&self, op: &'static str, error: ApiError) {
        self.tables().failures.insert(op, error);
    }

    /// Stop failing `op`.
    pub fn recover(&self, op: &'static str) {
        self.tables().failures.remove(op);
    }

    /// Fail mapping requests for `user`.
    pub fn fail_mapping_for(&self, user: &EntityId, error: ApiError) {
        self.tables().failing_mappings.insert(user.clone(), error);
    }

    /// Hold calls to `op` until [`InMemoryBackend::release`].
    pub fn hold(&self, op: &'static str) {
        self.tables().holds.insert(op, Arc::new(Semaphore::new(0)));
    }

    /// Let held calls to `op` proceed.
    pub fn release(&self, op: &'static str) {
        if let Some(hold) = self.tables().holds.remove(op) {
            hold.close();
        }
    }

    // --- inspection ------------------------------------------------------

    /// Every call in order, formatted as `op` or `op(detail)`.
    pub fn calls(&self) -> Vec<String> {
        self.tables().calls.clone()
    }

    /// Number of calls to `op`, whatever their detail.
    pub fn count(&self, op: &str) -> usize {
        self.tables()
            .calls
            .iter()
            .filter(|call| {
                call.strip_prefix(op)
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('('))
            })
            .count()
    }

    /// Forget recorded calls.
    pub fn reset_calls(&self) {
        self.tables().calls.clear();
    }

    /// Wait until `op` has been called at least `times` times.
    pub async fn called(&self, op: &str, times: usize) {
        while self.count(op) < times {
            tokio::task::yield_now().await;
        }
    }

    /// Stored regions.
    pub fn regions(&self) -> Vec<Region> {
        self.tables().regions.clone()
    }

    /// Stored users.
    pub fn users(&self) -> Vec<User> {
        self.tables().users.clone()
    }

    /// Stored mappings.
    pub fn mappings(&self) -> Vec<MappedProduct> {
        self.tables().mappings.clone()
    }
}

#[async_trait]
impl AuthApi for InMemoryBackend {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        self.enter("login", Some(credentials.ses_id())).await?;
        let tables = self.tables();
        let accepted = tables
            .passwords
            .get(credentials.ses_id())
            .is_some_and(|password| password == credentials.password());
        let user = tables
            .users
            .iter()
            .find(|user| user.ses_id == credentials.ses_id())
            .filter(|_| accepted)
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;
        Ok(LoginResponse {
            token: AuthToken::new(format!("token-{}", user.id)),
            user,
            message: "Login successful".into(),
        })
    }

    async fn forgot_password(&self, ses_id: &str) -> Result<MutationAck, ApiError> {
        self.enter("forgot_password", Some(ses_id)).await?;
        Ok(MutationAck::new("Reset link sent"))
    }

    async fn reset_password(&self, reset: &PasswordReset) -> Result<MutationAck, ApiError> {
        self.enter("reset_password", Some(reset.token())).await?;
        Ok(MutationAck::new("Password updated"))
    }

    async fn send_activation_email(
        &self,
        email: &EmailAddress,
    ) -> Result<ActivationChallenge, ApiError> {
        self.enter("send_activation_email", Some(email.as_str())).await?;
        Ok(ActivationChallenge {
            token: format!("challenge-{}", email.as_str()),
            expires_in: 300,
            message: "Verification code sent".into(),
        })
    }

    async fn verify_email(
        &self,
        verification: &EmailVerification,
    ) -> Result<VerifiedEmail, ApiError> {
        self.enter("verify_email", Some(verification.email.as_str()))
            .await?;
        Ok(VerifiedEmail {
            token: format!("verified-{}", verification.token),
            message: "Email verified".into(),
        })
    }
}

#[async_trait]
impl UsersApi for InMemoryBackend {
    async fn list_users(
        &self,
        _token: &AuthToken,
        page: PageRequest,
    ) -> Result<Page<User>, ApiError> {
        self.enter("list_users", Some(&page.page().to_string()))
            .await?;
        Ok(Page::slice(self.tables().users.clone(), page))
    }

    async fn all_users(&self, _token: &AuthToken) -> Result<Vec<User>, ApiError> {
        self.enter("all_users", None).await?;
        Ok(self.tables().users.clone())
    }

    async fn users_by_field(
        &self,
        _token: &AuthToken,
        filter: &UserFilter,
    ) -> Result<Vec<User>, ApiError> {
        self.enter("users_by_field", Some(filter.department.as_str()))
            .await?;
        let tables = self.tables();
        Ok(tables
            .users
            .iter()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect())
    }

    async fn register(&self, user: &NewUser) -> Result<MutationAck, ApiError> {
        self.enter("register", Some(&user.ses_id)).await?;
        self.tables().insert_user(user);
        Ok(MutationAck::new("Registration submitted"))
    }

    async fn create_user(
        &self,
        _token: &AuthToken,
        user: &NewUser,
    ) -> Result<MutationAck, ApiError> {
        self.enter("create_user", Some(&user.ses_id)).await?;
        self.tables().insert_user(user);
        Ok(MutationAck::new("User created"))
    }

    async fn update_user(
        &self,
        _token: &AuthToken,
        id: &EntityId,
        update: &UserUpdate,
    ) -> Result<MutationAck, ApiError> {
        self.enter("update_user", Some(id.as_str())).await?;
        let mut tables = self.tables();
        let user = tables
            .users
            .iter_mut()
            .find(|user| &user.id == id)
            .ok_or_else(|| missing("User", id))?;
        update.apply_to(user);
        Ok(MutationAck::new("User updated"))
    }

    async fn delete_user(
        &self,
        _token: &AuthToken,
        id: &EntityId,
    ) -> Result<MutationAck, ApiError> {
        self.enter("delete_user", Some(id.as_str())).await?;
        let mut tables = self.tables();
        let before = tables.users.len();
        tables.users.retain(|user| &user.id != id);
        if tables.users.len() == before {
            return Err(missing("User", id));
        }
        Ok(MutationAck::new("User deleted"))
    }

    async fn list_user_types(&self, _token: &AuthToken) -> Result<Vec<UserType>, ApiError> {
        self.enter("list_user_types", None).await?;
        Ok(self.tables().user_types.clone())
    }
}

#[async_trait]
impl GeographyApi for InMemoryBackend {
    async fn list_regions(&self, _token: &AuthToken) -> Result<Vec<Region>, ApiError> {
        self.enter("list_regions", None).await?;
        Ok(self.tables().regions.clone())
    }

    async fn create_region(
        &self,
        _token: &AuthToken,
        region: &NewRegion,
    ) -> Result<MutationAck, ApiError> {
        self.enter("create_region", Some(region.name())).await?;
        let mut tables = self.tables();
        let id = tables.issue_id();
        tables.regions.push(Region {
            id,
            name: region.name().to_owned(),
            is_active: region.is_active(),
            created_at: None,
            total_countries: None,
            total_cities: None,
        });
        Ok(MutationAck::new("Region created"))
    }

    async fn update_region(
        &self,
        _token: &AuthToken,
        id: &EntityId,
        update: &RegionUpdate,
    ) -> Result<MutationAck, ApiError> {
        self.enter("update_region", Some(id.as_str())).await?;
        let mut tables = self.tables();
        let region = tables
            .regions
            .iter_mut()
            .find(|region| &region.id == id)
            .ok_or_else(|| missing("Region", id))?;
        update.apply_to(region);
        Ok(MutationAck::new("Region updated"))
    }

    async fn delete_region(
        &self,
        _token: &AuthToken,
        id: &EntityId,
    ) -> Result<MutationAck, ApiError> {
        self.enter("delete_region", Some(id.as_str())).await?;
        let mut tables = self.tables();
        let before = tables.regions.len();
        tables.regions.retain(|region| &region.id != id);
        if tables.regions.len() == before {
            return Err(missing("Region", id));
        }
        Ok(MutationAck::new("Region deleted"))
    }

    async fn list_countries(
        &self,
        _token: &AuthToken,
        region: &EntityId,
    ) -> Result<Vec<Country>, ApiError> {
        self.enter("list_countries", Some(region.as_str())).await?;
        let tables = self.tables();
        Ok(tables
            .countries
            .iter()
            .filter(|country| country.region.points_to(region))
            .cloned()
            .collect())
    }

    async fn create_country(
        &self,
        _token: &AuthToken,
        country: &NewCountry,
    ) -> Result<MutationAck, ApiError> {
        self.enter("create_country", Some(country.name())).await?;
        let mut tables = self.tables();
        let id = tables.issue_id();
        let region = tables.region_ref(country.region());
        tables.countries.push(Country {
            id,
            name: country.name().to_owned(),
            code: country.code().map(str::to_owned),
            region,
            is_active: country.is_active(),
            created_at: None,
        });
        Ok(MutationAck::new("Country created"))
    }

    async fn update_country(
        &self,
        _token: &AuthToken,
        id: &EntityId,
        update: &CountryUpdate,
    ) -> Result<MutationAck, ApiError> {
        self.enter("update_country", Some(id.as_str())).await?;
        let mut tables = self.tables();
        let country = tables
            .countries
            .iter_mut()
            .find(|country| &country.id == id)
            .ok_or_else(|| missing("Country", id))?;
        update.apply_to(country);
        Ok(MutationAck::new("Country updated"))
    }

    async fn list_cities(
        &self,
        _token: &AuthToken,
        country: &EntityId,
    ) -> Result<Vec<City>, ApiError> {
        self.enter("list_cities", Some(country.as_str())).await?;
        let tables = self.tables();
        Ok(tables
            .cities
            .iter()
            .filter(|city| city.country.points_to(country))
            .cloned()
            .collect())
    }

    async fn create_city(
        &self,
        _token: &AuthToken,
        city: &NewCity,
    ) -> Result<MutationAck, ApiError> {
        self.enter("create_city", Some(city.name())).await?;
        let mut tables = self.tables();
        let id = tables.issue_id();
        let country = tables.country_ref(city.country());
        tables.cities.push(City {
            id,
            name: city.name().to_owned(),
            country,
            is_active: city.is_active(),
            created_at: None,
        });
        Ok(MutationAck::new("City created"))
    }
}

#[async_trait]
impl OrganizationApi for InMemoryBackend {
    async fn list_org_units(
        &self,
        _token: &AuthToken,
        kind: OrgUnitKind,
    ) -> Result<Vec<OrgUnit>, ApiError> {
        self.enter("list_org_units", Some(kind.label())).await?;
        Ok(self.tables().org_units(kind).clone())
    }

    async fn add_org_unit(
        &self,
        _token: &AuthToken,
        unit: &NewOrgUnit,
    ) -> Result<MutationAck, ApiError> {
        self.enter("add_org_unit", Some(unit.name())).await?;
        let mut tables = self.tables();
        let id = tables.issue_id();
        tables.org_units(unit.kind()).push(OrgUnit {
            id,
            name: unit.name().to_owned(),
        });
        Ok(MutationAck::new(format!("{} added", unit.kind())))
    }

    async fn import_org_units(
        &self,
        _token: &AuthToken,
        kind: OrgUnitKind,
        file: &ImportFile,
    ) -> Result<MutationAck, ApiError> {
        self.enter("import_org_units", Some(file.file_name())).await?;
        Ok(MutationAck::new(format!("{kind} file received")))
    }
}

#[async_trait]
impl ProductsApi for InMemoryBackend {
    async fn list_products(
        &self,
        _token: &AuthToken,
        page: PageRequest,
    ) -> Result<Page<DemoProduct>, ApiError> {
        self.enter("list_products", Some(&page.page().to_string()))
            .await?;
        Ok(Page::slice(self.tables().products.clone(), page))
    }

    async fn product(&self, _token: &AuthToken, id: &EntityId) -> Result<DemoProduct, ApiError> {
        self.enter("product", Some(id.as_str())).await?;
        let tables = self.tables();
        tables
            .products
            .iter()
            .find(|product| &product.id == id)
            .cloned()
            .ok_or_else(|| missing("Product", id))
    }

    async fn update_product(
        &self,
        _token: &AuthToken,
        id: &EntityId,
        update: &ProductUpdate,
    ) -> Result<MutationAck, ApiError> {
        self.enter("update_product", Some(id.as_str())).await?;
        let mut tables = self.tables();
        let product = tables
            .products
            .iter_mut()
            .find(|product| &product.id == id)
            .ok_or_else(|| missing("Product", id))?;
        update.apply_to(product);
        Ok(MutationAck::new("Product updated"))
    }

    async fn delete_product(
        &self,
        _token: &AuthToken,
        id: &EntityId,
    ) -> Result<MutationAck, ApiError> {
        self.enter("delete_product", Some(id.as_str())).await?;
        let mut tables = self.tables();
        let before = tables.products.len();
        tables.products.retain(|product| &product.id != id);
        if tables.products.len() == before {
            return Err(missing("Product", id));
        }
        Ok(MutationAck::new("Product deleted"))
    }
}

#[async_trait]
impl MappingsApi for InMemoryBackend {
    async fn list_mappings(&self, _token: &AuthToken) -> Result<Vec<MappedProduct>, ApiError> {
        self.enter("list_mappings", None).await?;
        Ok(self.tables().mappings.clone())
    }

    async fn create_mapping(
        &self,
        _token: &AuthToken,
        mapping: &NewMapping,
    ) -> Result<MutationAck, ApiError> {
        self.enter("create_mapping", Some(mapping.user.as_str()))
            .await?;
        let mut tables = self.tables();
        if let Some(error) = tables.failing_mappings.get(&mapping.user) {
            return Err(error.clone());
        }
        let id = tables.issue_id();
        tables.mappings.push(MappedProduct {
            id,
            product: Reference::new(mapping.product.clone()),
            user: Reference::new(mapping.user.clone()),
            created_at: None,
        });
        Ok(MutationAck::new("Product assigned"))
    }

    async fn delete_mapping(
        &self,
        _token: &AuthToken,
        id: &EntityId,
    ) -> Result<MutationAck, ApiError> {
        self.enter("delete_mapping", Some(id.as_str())).await?;
        let mut tables = self.tables();
        let before = tables.mappings.len();
        tables.mappings.retain(|mapping| &mapping.id != id);
        if tables.mappings.len() == before {
            return Err(missing("Mapping", id));
        }
        Ok(MutationAck::new("Mapping deleted"))
    }
}

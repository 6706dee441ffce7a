//! Behaviour tests for tag-scoped cache invalidation.
//!
//! Scenarios drive the dashboard against the in-memory backend and count the
//! list requests it records, so a refetch is visible as an extra call.

use std::sync::Arc;

use dashboard::domain::{
    CountryUpdate, EntityId, Error, ErrorCode, NewCountry, NewRegion, QueryData, QueryKey,
    QuerySubscription, Region, Role, Session, ViewScope,
};
use dashboard::test_support::session_for;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

mod support;

use support::{Harness, Names, named};

// -----------------------------------------------------------------------------
// Test World
// -----------------------------------------------------------------------------

#[derive(Default, ScenarioState)]
struct CacheWorld {
    harness: Slot<Harness>,
    session: Slot<Session>,
    names: Slot<Names>,
    subscriptions: Slot<Vec<Arc<QuerySubscription>>>,
    concurrent_reads: Slot<Vec<Vec<Region>>>,
    scoped_read: Slot<Result<Vec<Region>, Error>>,
}

impl CacheWorld {
    fn harness(&self) -> Harness {
        self.harness.get().expect("harness should be set")
    }

    fn session(&self) -> Session {
        self.session.get().expect("session should be set")
    }

    fn id_of(&self, name: &str) -> EntityId {
        named(&self.names.get().unwrap_or_default(), name)
    }

    fn remember(&self, name: &str, id: EntityId) {
        let mut names = self.names.get().unwrap_or_default();
        names.insert(name.to_owned(), id);
        self.names.set(names);
    }

    fn watch(&self, subscription: QuerySubscription) {
        let mut subscriptions = self.subscriptions.get().unwrap_or_default();
        subscriptions.push(Arc::new(subscription));
        self.subscriptions.set(subscriptions);
    }

    fn list_requests_for(&self, region: &str) -> usize {
        let expected = format!("list_countries({})", self.id_of(region));
        self.harness()
            .backend
            .calls()
            .iter()
            .filter(|call| **call == expected)
            .count()
    }

    fn cached_countries(&self, region: &str) -> Vec<String> {
        let key = QueryKey::Countries {
            region: self.id_of(region),
        };
        match self.harness().dashboard.snapshot(&key).data {
            Some(QueryData::Countries(countries)) => {
                countries.into_iter().map(|country| country.name).collect()
            }
            other => panic!("expected cached countries, got {other:?}"),
        }
    }
}

#[fixture]
fn world() -> CacheWorld {
    CacheWorld::default()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("an admin session over an empty backend")]
fn an_admin_session(world: &CacheWorld) {
    world.harness.set(Harness::new());
    world.session.set(session_for(Role::Admin));
}

#[given("a region named {name}")]
fn a_region_named(world: &CacheWorld, name: String) {
    let id = world.harness().backend.seed_region(&name, true);
    world.remember(&name, id);
}

#[given("the country {country} in {region}")]
fn the_country_in(world: &CacheWorld, country: String, region: String) {
    let id = world
        .harness()
        .backend
        .seed_country(&world.id_of(&region), &country);
    world.remember(&country, id);
}

#[given("a watched country list for {region}")]
fn a_watched_country_list(world: &CacheWorld, region: String) {
    let harness = world.harness();
    let region = world.id_of(&region);
    world.watch(harness.dashboard.subscribe(QueryKey::Countries {
        region: region.clone(),
    }));
    let session = world.session();
    harness
        .block_on(harness.dashboard.countries(&session, &region))
        .expect("initial country list loads");
}

#[given("a watched region list")]
fn a_watched_region_list(world: &CacheWorld) {
    let harness = world.harness();
    world.watch(harness.dashboard.subscribe(QueryKey::Regions));
    let session = world.session();
    harness
        .block_on(harness.dashboard.regions(&session))
        .expect("initial region list loads");
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("the admin creates the country {country} in {region}")]
fn the_admin_creates_the_country(world: &CacheWorld, country: String, region: String) {
    let harness = world.harness();
    let region = world.id_of(&region);
    let input = NewCountry::try_new(Some(&region), &country, true).expect("valid country");
    harness
        .block_on(harness.dashboard.create_country(&world.session(), &input))
        .expect("country created");
}

#[when("the admin moves {country} to {region}")]
fn the_admin_moves(world: &CacheWorld, country: String, region: String) {
    let harness = world.harness();
    let update = CountryUpdate {
        region: Some(world.id_of(&region)),
        ..CountryUpdate::default()
    };
    harness
        .block_on(
            harness
                .dashboard
                .update_country(&world.session(), &world.id_of(&country), &update),
        )
        .expect("country moved");
}

#[when("the admin creates an inactive region named {name}")]
fn the_admin_creates_an_inactive_region(world: &CacheWorld, name: String) {
    let harness = world.harness();
    let input = NewRegion::try_new(&name, false).expect("valid region");
    harness
        .block_on(harness.dashboard.create_region(&world.session(), &input))
        .expect("region created");
}

#[when("two views read the region list at the same time")]
fn two_views_read_the_region_list(world: &CacheWorld) {
    let harness = world.harness();
    let session = world.session();
    let backend = Arc::clone(&harness.backend);
    backend.hold("list_regions");
    let (first, second, ()) = harness.block_on(async {
        tokio::join!(
            harness.dashboard.regions(&session),
            harness.dashboard.regions(&session),
            async {
                backend.called("list_regions", 1).await;
                backend.release("list_regions");
            }
        )
    });
    world.concurrent_reads.set(vec![
        first.expect("first read succeeds"),
        second.expect("second read succeeds"),
    ]);
}

#[when("a view closes while its region read is pending")]
fn a_view_closes_while_pending(world: &CacheWorld) {
    let harness = world.harness();
    let session = world.session();
    let backend = Arc::clone(&harness.backend);
    let dashboard = harness.dashboard.clone();
    backend.hold("list_regions");
    let result = harness.block_on(async move {
        let scope = ViewScope::new("regions");
        let read = tokio::spawn(scope.run(async move { dashboard.regions(&session).await }));
        backend.called("list_regions", 1).await;
        scope.close();
        let result = read.await.expect("read task joins");
        backend.release("list_regions");
        result
    });
    world.scoped_read.set(result);
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the countries of {region} were fetched {count} times")]
fn the_countries_were_fetched(world: &CacheWorld, region: String, count: usize) {
    assert_eq!(
        world.list_requests_for(&region),
        count,
        "calls: {:?}",
        world.harness().backend.calls()
    );
}

#[then("the cached countries of {region} include {country}")]
fn the_cached_countries_include(world: &CacheWorld, region: String, country: String) {
    let cached = world.cached_countries(&region);
    assert!(cached.contains(&country), "cached countries: {cached:?}");
}

#[then("the region list was fetched {count} times")]
fn the_region_list_was_fetched(world: &CacheWorld, count: usize) {
    assert_eq!(world.harness().backend.count("list_regions"), count);
}

#[then("the cached region {name} is inactive")]
fn the_cached_region_is_inactive(world: &CacheWorld, name: String) {
    let snapshot = world.harness().dashboard.snapshot(&QueryKey::Regions);
    let Some(QueryData::Regions(regions)) = snapshot.data else {
        panic!("expected cached regions, got {:?}", snapshot.data);
    };
    let region = regions
        .iter()
        .find(|region| region.name == name)
        .unwrap_or_else(|| panic!("{name} missing from {regions:?}"));
    assert!(!region.is_active);
}

#[then("both views received the same regions")]
fn both_views_received_the_same_regions(world: &CacheWorld) {
    let reads = world.concurrent_reads.get().expect("reads recorded");
    assert_eq!(reads.len(), 2);
    assert_eq!(reads[0], reads[1]);
    assert!(!reads[0].is_empty());
}

#[then("the view read was cancelled")]
fn the_view_read_was_cancelled(world: &CacheWorld) {
    let result = world.scoped_read.get().expect("scoped read recorded");
    let error = result.expect_err("closed view must not deliver data");
    assert_eq!(error.code(), ErrorCode::Cancelled);
}

#[then("the region list cache holds no data")]
fn the_region_list_cache_holds_no_data(world: &CacheWorld) {
    let snapshot = world.harness().dashboard.snapshot(&QueryKey::Regions);
    assert!(snapshot.data.is_none());
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/cache_invalidation.feature",
    name = "Creating a country refreshes only its own region"
)]
fn creating_a_country_refreshes_only_its_region(world: CacheWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/cache_invalidation.feature",
    name = "Moving a country refreshes both regions"
)]
fn moving_a_country_refreshes_both_regions(world: CacheWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/cache_invalidation.feature",
    name = "A region created inactive is listed as inactive"
)]
fn a_region_created_inactive_is_listed_as_inactive(world: CacheWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/cache_invalidation.feature",
    name = "Identical reads in flight share one request"
)]
fn identical_reads_in_flight_share_one_request(world: CacheWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/cache_invalidation.feature",
    name = "Closing a view discards its pending read"
)]
fn closing_a_view_discards_its_pending_read(world: CacheWorld) {
    let _ = world;
}

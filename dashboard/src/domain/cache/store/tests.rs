//! Tests for entry lifecycle, invalidation and in-flight guards.

use super::*;
use crate::domain::{EntityId, Reference, Region};
use pagination::{Page, PageRequest};
use rstest::{fixture, rstest};

fn id(value: &str) -> EntityId {
    EntityId::new(value).expect("valid id")
}

fn regions(names: &[&str]) -> QueryData {
    QueryData::Regions(
        names
            .iter()
            .map(|name| Region {
                id: id(name),
                name: (*name).to_owned(),
                is_active: true,
                created_at: None,
                total_countries: None,
                total_cities: None,
            })
            .collect(),
    )
}

fn countries_key(region: &str) -> QueryKey {
    QueryKey::Countries { region: id(region) }
}

fn countries(region: &str, names: &[&str]) -> QueryData {
    QueryData::Countries(
        names
            .iter()
            .map(|name| crate::domain::Country {
                id: id(name),
                name: (*name).to_owned(),
                code: None,
                region: Reference::new(id(region)),
                is_active: true,
                created_at: None,
            })
            .collect(),
    )
}

#[fixture]
fn cache() -> Arc<QueryCache> {
    Arc::new(QueryCache::new())
}

#[rstest]
fn unknown_keys_are_idle(cache: Arc<QueryCache>) {
    let snapshot = cache.snapshot(&QueryKey::Regions);
    assert_eq!(snapshot.status, QueryStatus::Idle);
    assert!(snapshot.data.is_none());
}

#[rstest]
fn completed_fetch_is_fresh(cache: Arc<QueryCache>) {
    let key = QueryKey::Regions;
    let ticket = cache.begin_fetch(&key);
    assert_eq!(cache.snapshot(&key).status, QueryStatus::Loading);

    let outcome = ticket.complete(&Ok(regions(&["eu"])));
    assert_eq!(outcome, FetchOutcome::Applied);
    assert_eq!(cache.fresh(&key), Some(regions(&["eu"])));
    let tags: Vec<String> = cache
        .snapshot(&key)
        .tags
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(tags, ["Region:LIST", "Region:eu"]);
}

#[rstest]
fn invalidation_keeps_last_good_data(cache: Arc<QueryCache>) {
    let key = QueryKey::Regions;
    let _ = cache.begin_fetch(&key).complete(&Ok(regions(&["eu"])));

    cache.invalidate(&[CacheTag::list(crate::domain::EntityKind::Region)]);
    assert!(cache.fresh(&key).is_none());

    let ticket = cache.begin_fetch(&key);
    let snapshot = cache.snapshot(&key);
    assert_eq!(snapshot.status, QueryStatus::Loading);
    assert!(snapshot.is_stale);
    assert_eq!(snapshot.data, Some(regions(&["eu"])));
    drop(ticket);
}

#[rstest]
fn failures_keep_previous_data(cache: Arc<QueryCache>) {
    let key = QueryKey::Regions;
    let _ = cache.begin_fetch(&key).complete(&Ok(regions(&["eu"])));
    cache.invalidate(&[CacheTag::list(crate::domain::EntityKind::Region)]);

    let _ = cache
        .begin_fetch(&key)
        .complete(&Err(Error::service_unavailable("down")));
    let snapshot = cache.snapshot(&key);
    assert_eq!(snapshot.status, QueryStatus::Error);
    assert_eq!(snapshot.data, Some(regions(&["eu"])));
    assert_eq!(snapshot.error.map(|e| e.code()), Some(crate::domain::ErrorCode::ServiceUnavailable));
}

#[rstest]
fn scoped_invalidation_spares_other_regions(cache: Arc<QueryCache>) {
    let a = countries_key("a");
    let b = countries_key("b");
    let _ = cache.begin_fetch(&a).complete(&Ok(countries("a", &["fr"])));
    let _ = cache.begin_fetch(&b).complete(&Ok(countries("b", &["jp"])));

    cache.invalidate(&[CacheTag::for_region(
        crate::domain::EntityKind::Country,
        id("a"),
    )]);

    assert!(cache.fresh(&a).is_none());
    assert_eq!(cache.fresh(&b), Some(countries("b", &["jp"])));
}

#[rstest]
fn responses_overtaken_by_invalidation_are_dropped(cache: Arc<QueryCache>) {
    let key = QueryKey::Regions;
    let ticket = cache.begin_fetch(&key);
    cache.invalidate(&[CacheTag::list(crate::domain::EntityKind::Region)]);

    assert_eq!(ticket.complete(&Ok(regions(&["old"]))), FetchOutcome::Superseded);
    assert!(cache.snapshot(&key).data.is_none());
}

#[rstest]
fn dropped_ticket_restores_previous_state(cache: Arc<QueryCache>) {
    let key = QueryKey::Regions;
    drop(cache.begin_fetch(&key));
    assert_eq!(cache.snapshot(&key).status, QueryStatus::Idle);

    let _ = cache.begin_fetch(&key).complete(&Ok(regions(&["eu"])));
    drop(cache.begin_fetch(&key));
    let snapshot = cache.snapshot(&key);
    assert_eq!(snapshot.status, QueryStatus::Success);
    assert_eq!(snapshot.data, Some(regions(&["eu"])));
}

#[rstest]
fn invalidate_reports_only_subscribed_keys(cache: Arc<QueryCache>) {
    let watched = countries_key("a");
    let unwatched = QueryKey::Regions;
    let _ = cache.begin_fetch(&watched).complete(&Ok(countries("a", &["fr"])));
    let _ = cache.begin_fetch(&unwatched).complete(&Ok(regions(&["a"])));

    let subscription = cache.subscribe(watched.clone());
    let refetch = cache.invalidate(&[
        CacheTag::all(crate::domain::EntityKind::Country),
        CacheTag::all(crate::domain::EntityKind::Region),
    ]);
    assert_eq!(refetch, vec![watched.clone()]);
    assert!(cache.snapshot(&unwatched).is_stale);

    drop(subscription);
    assert_eq!(cache.subscribers(&watched), 0);
}

#[rstest]
fn settled_since_reports_shared_outcome(cache: Arc<QueryCache>) {
    let key = QueryKey::Regions;
    let Probe::Miss { settled, .. } = cache.probe(&key) else {
        panic!("empty cache cannot hit");
    };
    assert!(cache.settled_since(&key, settled).is_none());

    let _ = cache
        .begin_fetch(&key)
        .complete(&Err(Error::service_unavailable("down")));
    let shared = cache.settled_since(&key, settled).expect("settled");
    assert!(shared.is_err());
}

#[rstest]
fn clear_keeps_subscribed_keys_empty(cache: Arc<QueryCache>) {
    let key = QueryKey::Regions;
    let _ = cache.begin_fetch(&key).complete(&Ok(regions(&["eu"])));
    let _ = cache.begin_fetch(&QueryKey::Mappings).complete(&Ok(QueryData::Mappings(Vec::new())));
    let _subscription = cache.subscribe(key.clone());

    cache.clear();
    assert_eq!(cache.len(), 1);
    assert!(cache.snapshot(&key).data.is_none());
    assert_eq!(cache.subscribers(&key), 1);
}

fn users_page(page: u32) -> QueryKey {
    QueryKey::Users(PageRequest::new(page, 10).expect("valid page"))
}

fn empty_user_page(page: u32) -> QueryData {
    QueryData::UserPage(Page {
        page,
        size: 10,
        total_pages: 3,
        total_count: 0,
        items: Vec::new(),
    })
}

fn filtered(department: &str) -> QueryKey {
    QueryKey::FilteredUsers(crate::domain::UserFilter {
        region: id("eu"),
        country: id("fr"),
        department: department.to_owned(),
        designation: "Engineer".to_owned(),
    })
}

#[rstest]
fn unwatched_pages_are_evicted_on_invalidation(cache: Arc<QueryCache>) {
    let first = users_page(1);
    let second = users_page(2);
    let _watching = cache.subscribe(second.clone());
    let _ = cache.begin_fetch(&second).complete(&Ok(empty_user_page(2)));
    let _ = cache.begin_fetch(&first).complete(&Ok(empty_user_page(1)));
    assert_eq!(cache.len(), 2);
    let _ = cache.begin_fetch(&QueryKey::Regions).complete(&Ok(regions(&["eu"])));

    let refetch = cache.invalidate(&[
        CacheTag::all(crate::domain::EntityKind::User),
        CacheTag::all(crate::domain::EntityKind::Region),
    ]);

    assert_eq!(refetch, vec![second.clone()]);
    assert_eq!(cache.snapshot(&first).status, QueryStatus::Idle);
    assert!(cache.snapshot(&second).is_stale);
    assert!(cache.snapshot(&QueryKey::Regions).is_stale);
    assert_eq!(cache.len(), 2);
}

#[rstest]
fn opening_a_filter_evicts_unwatched_siblings(cache: Arc<QueryCache>) {
    let sales = filtered("Sales");
    let support = filtered("Support");
    let _ = cache.begin_fetch(&sales).complete(&Ok(QueryData::Users(Vec::new())));
    let _ = cache.begin_fetch(&support).complete(&Ok(QueryData::Users(Vec::new())));
    assert_eq!(cache.len(), 1);
    assert!(cache.snapshot(&sales).data.is_none());

    let _watching = cache.subscribe(support.clone());
    let Probe::Miss { .. } = cache.probe(&filtered("Finance")) else {
        panic!("a new filter cannot hit");
    };
    assert_eq!(cache.len(), 2);
    assert!(cache.fresh(&support).is_some());
}

#[rstest]
fn loading_siblings_are_not_evicted(cache: Arc<QueryCache>) {
    let first = users_page(1);
    let pending = cache.begin_fetch(&first);
    let _ = cache.begin_fetch(&users_page(2)).complete(&Ok(empty_user_page(2)));

    assert_eq!(pending.complete(&Ok(empty_user_page(1))), FetchOutcome::Applied);
    assert_eq!(cache.fresh(&first), Some(empty_user_page(1)));
}

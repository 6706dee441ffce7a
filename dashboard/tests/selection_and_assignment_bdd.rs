//! Behaviour tests for cascading selection, the filtered user lookup and
//! bulk product assignment.

use dashboard::domain::ports::ApiError;
use dashboard::domain::{
    ASSIGNMENT_FAILED, AssignedUser, EntityId, Error, ErrorCode, INCOMPLETE_FILTERS,
    RegistrationOrigin, Role, Session, User, ViewState,
};
use dashboard::test_support::{id, registration_form, session_for};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::json;

mod support;

use support::{Harness, Names, named};

// -----------------------------------------------------------------------------
// Test World
// -----------------------------------------------------------------------------

#[derive(Default, ScenarioState)]
struct SelectionWorld {
    harness: Slot<Harness>,
    session: Slot<Session>,
    names: Slot<Names>,
    /// Country name to the id of its region.
    parents: Slot<Names>,
    view: Slot<ViewState>,
    filtered: Slot<Result<Vec<User>, Error>>,
    assignment: Slot<Result<(), Error>>,
}

impl SelectionWorld {
    fn harness(&self) -> Harness {
        self.harness.get().expect("harness should be set")
    }

    fn session(&self) -> Session {
        self.session.get().expect("session should be set")
    }

    fn view(&self) -> ViewState {
        self.view.get().unwrap_or_default()
    }

    fn update_view(&self, change: impl FnOnce(&mut ViewState)) {
        let mut view = self.view();
        change(&mut view);
        self.view.set(view);
    }

    fn id_of(&self, name: &str) -> EntityId {
        named(&self.names.get().unwrap_or_default(), name)
    }

    fn remember(&self, slot: &Slot<Names>, name: &str, id: EntityId) {
        let mut names = slot.get().unwrap_or_default();
        names.insert(name.to_owned(), id);
        slot.set(names);
    }

    fn pick(&self, users: &[&str]) {
        self.update_view(|view| {
            for user in users {
                view.draft
                    .add(AssignedUser {
                        id: id(user),
                        name: (*user).to_owned(),
                    })
                    .expect("user not yet picked");
            }
        });
    }

    fn mapped_users(&self) -> Vec<String> {
        let mut users: Vec<String> = self
            .harness()
            .backend
            .mappings()
            .iter()
            .map(|mapping| mapping.user.id().as_str().to_owned())
            .collect();
        users.sort();
        users
    }
}

#[fixture]
fn world() -> SelectionWorld {
    SelectionWorld::default()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("an admin session over an empty backend")]
fn an_admin_session(world: &SelectionWorld) {
    world.harness.set(Harness::new());
    world.session.set(session_for(Role::Admin));
}

#[given("a region named {name}")]
fn a_region_named(world: &SelectionWorld, name: String) {
    let id = world.harness().backend.seed_region(&name, true);
    world.remember(&world.names, &name, id);
}

#[given("the country {country} in {region}")]
fn the_country_in(world: &SelectionWorld, country: String, region: String) {
    let region = world.id_of(&region);
    let id = world.harness().backend.seed_country(&region, &country);
    world.remember(&world.names, &country, id);
    world.remember(&world.parents, &country, region);
}

#[given("an employee {ses_id} in {department} working as {designation} in {country}")]
fn an_employee_in(
    world: &SelectionWorld,
    ses_id: String,
    department: String,
    designation: String,
    country: String,
) {
    let backend = world.harness().backend;
    let region = named(&world.parents.get().unwrap_or_default(), &country);
    let mut form = registration_form(
        &ses_id,
        backend.user_type_id(Role::Employee),
        region,
        world.id_of(&country),
    );
    form.department = department;
    form.designation = designation;
    let user = form
        .validate(RegistrationOrigin::Administrator)
        .expect("valid registration");
    backend.seed_account(&user);
}

#[given("a product named {title}")]
fn a_product_named(world: &SelectionWorld, title: String) {
    let product = world.harness().backend.seed_product(&title);
    world.update_view(|view| view.draft.select_product(Some(product)));
}

#[given("users u1, u2 and u3 are picked for the product")]
fn three_users_are_picked(world: &SelectionWorld) {
    world.pick(&["u1", "u2", "u3"]);
}

#[given("mapping requests for {user} fail")]
fn mapping_requests_fail(world: &SelectionWorld, user: String) {
    world
        .harness()
        .backend
        .fail_mapping_for(&id(&user), ApiError::rejected(500_u16, "mapping store offline"));
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("the user selects region {region} and country {country}")]
fn the_user_selects_region_and_country(world: &SelectionWorld, region: String, country: String) {
    let region = world.id_of(&region);
    let country = world.id_of(&country);
    world.update_view(|view| {
        view.selection.select_region(Some(region));
        view.selection.select_country(Some(country));
    });
}

#[when("the user switches to region {region}")]
fn the_user_switches_region(world: &SelectionWorld, region: String) {
    let region = world.id_of(&region);
    world.update_view(|view| view.selection.select_region(Some(region)));
}

#[when("the user filters on department {department} and designation {designation}")]
fn the_user_filters_on(world: &SelectionWorld, department: String, designation: String) {
    world.update_view(|view| {
        view.selection.set_department(department);
        view.selection.set_designation(designation);
    });
}

#[when("the user runs the user filter")]
fn the_user_runs_the_filter(world: &SelectionWorld) {
    let harness = world.harness();
    let session = world.session();
    let mut view = world.view();
    let result = harness.block_on(harness.dashboard.filter_users(&session, &mut view.selection));
    world.view.set(view);
    world.filtered.set(result);
}

#[when("the admin submits the assignment")]
fn the_admin_submits_the_assignment(world: &SelectionWorld) {
    let harness = world.harness();
    let session = world.session();
    let mut view = world.view();
    let result = harness
        .block_on(harness.dashboard.submit_assignment(&session, &mut view))
        .map(|_| ());
    world.view.set(view);
    world.assignment.set(result);
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("no country is selected")]
fn no_country_is_selected(world: &SelectionWorld) {
    let view = world.view();
    assert!(view.selection.region().is_some());
    assert_eq!(view.selection.country(), None);
}

#[then("the filter is rejected with country, department and designation missing")]
fn the_filter_is_rejected(world: &SelectionWorld) {
    let error = world
        .filtered
        .get()
        .expect("filter result recorded")
        .expect_err("incomplete filters must be rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), INCOMPLETE_FILTERS);
    assert_eq!(
        error.details(),
        Some(&json!({ "missing": ["country", "department", "designation"] }))
    );
}

#[then("no filtered user request was sent")]
fn no_filtered_user_request_was_sent(world: &SelectionWorld) {
    assert_eq!(world.harness().backend.count("users_by_field"), 0);
}

#[then("the filtered users are {ses_id}")]
fn the_filtered_users_are(world: &SelectionWorld, ses_id: String) {
    let users = world
        .filtered
        .get()
        .expect("filter result recorded")
        .expect("filter succeeds");
    let found: Vec<&str> = users.iter().map(|user| user.ses_id.as_str()).collect();
    assert_eq!(found, vec![ses_id.as_str()]);
    assert!(world.view().selection.applied_filter().is_some());
}

#[then("the assignment is reported as failed")]
fn the_assignment_is_reported_as_failed(world: &SelectionWorld) {
    let error = world
        .assignment
        .get()
        .expect("assignment result recorded")
        .expect_err("partial failure must fail the batch");
    assert_eq!(error.message(), ASSIGNMENT_FAILED);
    let details = error.details().expect("failure details");
    assert_eq!(details["failed"][0]["user"], json!("u2"));
}

#[then("mappings exist for u1 and u3 only")]
fn mappings_exist_for_u1_and_u3(world: &SelectionWorld) {
    assert_eq!(world.mapped_users(), vec!["u1", "u3"]);
}

#[then("mappings exist for u1, u2 and u3")]
fn mappings_exist_for_all(world: &SelectionWorld) {
    assert_eq!(world.mapped_users(), vec!["u1", "u2", "u3"]);
}

#[then("the picked users are kept for retry")]
fn the_picked_users_are_kept(world: &SelectionWorld) {
    let view = world.view();
    assert!(view.draft.product().is_some());
    let picked: Vec<&str> = view
        .draft
        .users()
        .iter()
        .map(|user| user.name.as_str())
        .collect();
    assert_eq!(picked, vec!["u1", "u2", "u3"]);
}

#[then("the assignment draft is empty")]
fn the_assignment_draft_is_empty(world: &SelectionWorld) {
    world
        .assignment
        .get()
        .expect("assignment result recorded")
        .expect("assignment succeeds");
    let view = world.view();
    assert!(view.draft.product().is_none());
    assert!(view.draft.users().is_empty());
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/selection_and_assignment.feature",
    name = "Changing the region clears the selected country"
)]
fn changing_the_region_clears_the_country(world: SelectionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/selection_and_assignment.feature",
    name = "Incomplete filters send no request"
)]
fn incomplete_filters_send_no_request(world: SelectionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/selection_and_assignment.feature",
    name = "Complete filters return matching users"
)]
fn complete_filters_return_matching_users(world: SelectionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/selection_and_assignment.feature",
    name = "A partial bulk failure is reported as one failure"
)]
fn a_partial_bulk_failure_is_reported(world: SelectionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/selection_and_assignment.feature",
    name = "A successful bulk assignment resets the view"
)]
fn a_successful_bulk_assignment_resets_the_view(world: SelectionWorld) {
    let _ = world;
}

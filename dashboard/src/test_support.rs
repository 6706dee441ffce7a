//! Test utilities for the dashboard crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

mod in_memory;

pub use self::in_memory::InMemoryBackend;

use std::path::PathBuf;

use tempfile::TempDir;

use crate::domain::{
    AuthToken, EntityId, LoginCredentials, Reference, RegistrationForm, Role, Session, User,
};

/// Deterministic 24-character hexadecimal id, as the backend issues them.
///
/// # Examples
/// ```
/// use dashboard::test_support::object_id;
///
/// assert_eq!(object_id(255).as_str(), "0000000000000000000000ff");
/// assert!(object_id(1).is_object_id());
/// ```
///
/// # Panics
///
/// Never: the formatted value is always a valid id.
pub fn object_id(seed: u64) -> EntityId {
    match EntityId::new(format!("{seed:024x}")) {
        Ok(id) => id,
        Err(error) => panic!("formatted object id rejected: {error}"),
    }
}

/// Short, non-hexadecimal id for records whose id shape does not matter.
///
/// # Panics
///
/// Panics when `raw` is blank.
pub fn id(raw: &str) -> EntityId {
    match EntityId::new(raw) {
        Ok(id) => id,
        Err(error) => panic!("invalid test id {raw:?}: {error}"),
    }
}

/// User record with the given role and activation state.
pub fn user_with_role(id: EntityId, role: Role, active: bool) -> User {
    User {
        ses_id: format!("SESA{}", id.as_str()),
        name: format!("User {}", id.as_str()),
        email: format!("{}@example.com", id.as_str()),
        id,
        is_active: active,
        is_approved: active,
        department: "Sales".into(),
        designation: "Engineer".into(),
        region: None,
        country: None,
        user_type: Some(Reference::named(object_id(900), role.as_str())),
        created_at: None,
    }
}

/// Session for a user holding `role`, without going through login.
pub fn session_for(role: Role) -> Session {
    let user = user_with_role(id(&format!("{}-1", role.as_str())), role, true);
    Session::new(AuthToken::new(format!("token-{}", role.as_str())), user, role)
}

/// Validated login credentials.
///
/// # Panics
///
/// Panics when the fixed credentials fail validation.
pub fn credentials(ses_id: &str, password: &str) -> LoginCredentials {
    match LoginCredentials::try_from_parts(ses_id, password) {
        Ok(credentials) => credentials,
        Err(error) => panic!("invalid test credentials: {error}"),
    }
}

/// Complete registration form for `ses_id` in the given region and country.
pub fn registration_form(
    ses_id: &str,
    user_type: EntityId,
    region: EntityId,
    country: EntityId,
) -> RegistrationForm {
    RegistrationForm {
        name: format!("User {ses_id}"),
        ses_id: ses_id.to_owned(),
        email: format!("{}@example.com", ses_id.to_lowercase()),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        user_type: Some(user_type),
        region: Some(region),
        country: Some(country),
        department: "Sales".into(),
        designation: "Engineer".into(),
        verification_token: None,
    }
}

/// Temporary directory and a session file path inside it.
///
/// # Panics
///
/// Panics when the temporary directory cannot be created.
pub fn temp_session_path() -> (TempDir, PathBuf) {
    let dir = match TempDir::new() {
        Ok(dir) => dir,
        Err(error) => panic!("create temp dir: {error}"),
    };
    let path = dir.path().join("session.json");
    (dir, path)
}

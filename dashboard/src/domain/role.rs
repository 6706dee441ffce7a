//! Caller roles and the user-type lookup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::EntityId;

/// Role assigned to an account by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full read/write administration.
    Admin,
    /// Regional administrator: scoped reads, approves and edits in region.
    Regional,
    /// Employee: read-only self-service.
    Employee,
}

impl Role {
    /// All roles in display order.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Regional, Self::Employee];

    /// Wire name used by the backend's `type_name` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Regional => "regional",
            Self::Employee => "employee",
        }
    }

    /// Title shown in the navigation bar and the users table.
    pub fn display_title(self) -> &'static str {
        match self {
            Self::Admin => "The Maestro",
            Self::Regional => "Experience Leader",
            Self::Employee => "Virtual Guide",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a `type_name` does not name a known role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "regional" | "regional admin" => Ok(Self::Regional),
            "employee" => Ok(Self::Employee),
            _ => Err(UnknownRole(value.to_owned())),
        }
    }
}

/// Entry of the user-type lookup list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserType {
    /// Backend identifier.
    pub id: EntityId,
    /// Raw type name as sent by the backend.
    pub type_name: String,
}

impl UserType {
    /// Role named by this entry, if recognised.
    pub fn role(&self) -> Option<Role> {
        self.type_name.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("admin", Role::Admin)]
    #[case("Regional Admin", Role::Regional)]
    #[case(" employee ", Role::Employee)]
    fn parses_backend_type_names(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_type_names() {
        assert_eq!(
            "superuser".parse::<Role>(),
            Err(UnknownRole("superuser".to_owned()))
        );
    }

    #[rstest]
    #[case(Role::Admin, "The Maestro")]
    #[case(Role::Regional, "Experience Leader")]
    #[case(Role::Employee, "Virtual Guide")]
    fn display_titles_match_navigation(#[case] role: Role, #[case] title: &str) {
        assert_eq!(role.display_title(), title);
    }

    #[rstest]
    fn serialises_lowercase() {
        let json = serde_json::to_string(&Role::Regional).expect("serialise role");
        assert_eq!(json, "\"regional\"");
    }
}

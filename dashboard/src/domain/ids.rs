//! Opaque entity identifiers shared by every record type.
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of the hexadecimal object ids issued by the backend.
const OBJECT_ID_LEN: usize = 24;

/// Identifier of a backend record.
///
/// ## Invariants
/// - non-empty
/// - no whitespace anywhere
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Construct an id after validating that it is non-empty and whitespace-free.
    pub fn new(value: impl Into<String>) -> Result<Self, EntityIdValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(EntityIdValidationError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(EntityIdValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Whether the id has the 24-hex-digit shape of a backend object id.
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::EntityId;
    ///
    /// let id = EntityId::new("65f1c2a9b3e4d5f6a7b8c9d0").unwrap();
    /// assert!(id.is_object_id());
    /// assert!(!EntityId::new("region-1").unwrap().is_object_id());
    /// ```
    pub fn is_object_id(&self) -> bool {
        self.0.len() == OBJECT_ID_LEN && self.0.bytes().all(|byte| byte.is_ascii_hexdigit())
    }

    /// Borrow the underlying id as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

impl TryFrom<String> for EntityId {
    type Error = EntityIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EntityId {
    type Error = EntityIdValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validation errors returned when constructing [`EntityId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityIdValidationError {
    /// Id is empty after trimming whitespace.
    #[error("id must not be empty")]
    Empty,
    /// Id contains whitespace.
    #[error("id must not contain whitespace")]
    ContainsWhitespace,
}

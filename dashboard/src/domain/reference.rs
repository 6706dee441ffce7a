//! Normalised references between records.
//!
//! The backend sends a reference either as a bare id or as a populated object
//! carrying the id and a display name. Adapters collapse both shapes into
//! [`Reference`] at the boundary; nothing past the adapters sees the raw form.

use serde::{Deserialize, Serialize};

use super::EntityId;

/// Pointer to another record with an optional denormalised display name.
///
/// # Examples
/// ```
/// use dashboard::domain::{EntityId, Reference};
///
/// let bare = Reference::new(EntityId::new("u1").unwrap());
/// assert_eq!(bare.label(), "u1");
///
/// let named = Reference::named(EntityId::new("u1").unwrap(), "Ada");
/// assert_eq!(named.label(), "Ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Reference {
    /// Reference carrying only the id.
    pub fn new(id: EntityId) -> Self {
        Self { id, name: None }
    }

    /// Reference carrying the id and a display name.
    pub fn named(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }

    /// Build from an id and an optional name, discarding blank names.
    pub fn from_parts(id: EntityId, name: Option<String>) -> Self {
        let name = name.filter(|value| !value.trim().is_empty());
        Self { id, name }
    }

    /// Identifier of the referenced record.
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Denormalised display name, when the backend populated it.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Text shown in tables: the name when present, otherwise the id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.id.as_str())
    }

    /// Whether this reference points at `id`.
    pub fn points_to(&self, id: &EntityId) -> bool {
        &self.id == id
    }
}

impl From<EntityId> for Reference {
    fn from(value: EntityId) -> Self {
        Self::new(value)
    }
}

//! Cache tags attached to query results.
//!
//! A read provides a set of tags; a write invalidates a set of tags. An entry
//! is invalidated when any tag it provides is matched by an invalidated tag.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::EntityId;

/// Entity family a tag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Paginated and full user lists.
    User,
    /// Users matched by the region/country/department/designation filter.
    FilteredUsers,
    /// User-type lookup.
    UserType,
    /// Regions.
    Region,
    /// Countries.
    Country,
    /// Cities.
    City,
    /// Department lookup.
    Department,
    /// Designation lookup.
    Designation,
    /// Demo products.
    DemoProduct,
    /// Product-to-user mappings.
    MappedProduct,
}

impl EntityKind {
    /// Name used in log fields and tag rendering.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::FilteredUsers => "FilteredUsers",
            Self::UserType => "UserType",
            Self::Region => "Region",
            Self::Country => "Country",
            Self::City => "City",
            Self::Department => "Department",
            Self::Designation => "Designation",
            Self::DemoProduct => "DemoProduct",
            Self::MappedProduct => "MappedProduct",
        }
    }
}

/// Which slice of an entity family a tag covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagScope {
    /// Every entry of the family; only meaningful when invalidating.
    All,
    /// The unscoped list.
    List,
    /// One record.
    Item(EntityId),
    /// Children of one region.
    ListForRegion(EntityId),
    /// Children of one country.
    ListForCountry(EntityId),
}

/// Label tying cached reads to the writes that make them stale.
///
/// # Examples
/// ```
/// use dashboard::domain::{CacheTag, EntityId, EntityKind};
///
/// let region = EntityId::new("r1").unwrap();
/// let provided = CacheTag::for_region(EntityKind::Country, region.clone());
/// assert_eq!(provided.to_string(), "Country:LIST_FOR_REGION_r1");
/// assert!(CacheTag::all(EntityKind::Country).matches(&provided));
/// assert!(!CacheTag::list(EntityKind::Country).matches(&provided));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheTag {
    kind: EntityKind,
    scope: TagScope,
}

impl CacheTag {
    /// Tag covering every entry of `kind`.
    pub const fn all(kind: EntityKind) -> Self {
        Self {
            kind,
            scope: TagScope::All,
        }
    }

    /// Tag for the unscoped list of `kind`.
    pub const fn list(kind: EntityKind) -> Self {
        Self {
            kind,
            scope: TagScope::List,
        }
    }

    /// Tag for one record.
    pub fn item(kind: EntityKind, id: EntityId) -> Self {
        Self {
            kind,
            scope: TagScope::Item(id),
        }
    }

    /// Tag for the list of `kind` scoped to one region.
    pub fn for_region(kind: EntityKind, region: EntityId) -> Self {
        Self {
            kind,
            scope: TagScope::ListForRegion(region),
        }
    }

    /// Tag for the list of `kind` scoped to one country.
    pub fn for_country(kind: EntityKind, country: EntityId) -> Self {
        Self {
            kind,
            scope: TagScope::ListForCountry(country),
        }
    }

    /// Entity family.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Covered slice.
    pub fn scope(&self) -> &TagScope {
        &self.scope
    }

    /// Whether invalidating `self` invalidates an entry providing `provided`.
    pub fn matches(&self, provided: &Self) -> bool {
        if self.kind != provided.kind {
            return false;
        }
        matches!(self.scope, TagScope::All) || self.scope == provided.scope
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind.as_str();
        match &self.scope {
            TagScope::All => write!(f, "{kind}"),
            TagScope::List => write!(f, "{kind}:LIST"),
            TagScope::Item(id) => write!(f, "{kind}:{id}"),
            TagScope::ListForRegion(id) => write!(f, "{kind}:LIST_FOR_REGION_{id}"),
            TagScope::ListForCountry(id) => write!(f, "{kind}:LIST_FOR_COUNTRY_{id}"),
        }
    }
}

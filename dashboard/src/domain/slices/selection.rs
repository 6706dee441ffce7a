//! Cascading region → country → department/designation selection.

use std::fmt;

use crate::domain::{EntityId, UserFilter};

/// Message shown when the filtered user lookup is attempted too early.
pub const INCOMPLETE_FILTERS: &str = "Please select all filters";

/// Raised when the filter selection is incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteFilters {
    /// Names of the empty fields, in form order.
    pub missing: Vec<&'static str>,
}

impl fmt::Display for IncompleteFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(INCOMPLETE_FILTERS)
    }
}

impl std::error::Error for IncompleteFilters {}

/// Selection driving which geographic and filtered reads are issued.
///
/// ## Invariants
/// - changing or clearing the region clears the country in the same call,
///   so the country never refers to a previously selected region.
///
/// # Examples
/// ```
/// use dashboard::domain::{EntityId, SelectionState};
///
/// let id = |v: &str| EntityId::new(v).unwrap();
/// let mut selection = SelectionState::default();
/// selection.select_region(Some(id("a")));
/// selection.select_country(Some(id("fr")));
/// selection.select_region(Some(id("b")));
/// assert_eq!(selection.country(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    region: Option<EntityId>,
    country: Option<EntityId>,
    department: String,
    designation: String,
    applied: Option<UserFilter>,
}

impl SelectionState {
    /// Selected region.
    pub fn region(&self) -> Option<&EntityId> {
        self.region.as_ref()
    }

    /// Selected country.
    pub fn country(&self) -> Option<&EntityId> {
        self.country.as_ref()
    }

    /// Selected department.
    pub fn department(&self) -> &str {
        &self.department
    }

    /// Selected designation.
    pub fn designation(&self) -> &str {
        &self.designation
    }

    /// Select or clear the region; a different value clears the country.
    pub fn select_region(&mut self, region: Option<EntityId>) {
        if self.region != region {
            self.country = None;
        }
        self.region = region;
    }

    /// Select or clear the country.
    pub fn select_country(&mut self, country: Option<EntityId>) {
        self.country = country;
    }

    /// Set the department filter.
    pub fn set_department(&mut self, department: impl Into<String>) {
        self.department = department.into();
    }

    /// Set the designation filter.
    pub fn set_designation(&mut self, designation: impl Into<String>) {
        self.designation = designation.into();
    }

    /// Complete filter for the lookup, or the list of empty fields.
    pub fn filter_criteria(&self) -> Result<UserFilter, IncompleteFilters> {
        let department = self.department.trim();
        let designation = self.designation.trim();
        let missing: Vec<&'static str> = [
            ("region", self.region.is_none()),
            ("country", self.country.is_none()),
            ("department", department.is_empty()),
            ("designation", designation.is_empty()),
        ]
        .into_iter()
        .filter_map(|(name, empty)| empty.then_some(name))
        .collect();
        match (&self.region, &self.country) {
            (Some(region), Some(country)) if missing.is_empty() => Ok(UserFilter {
                region: region.clone(),
                country: country.clone(),
                department: department.to_owned(),
                designation: designation.to_owned(),
            }),
            _ => Err(IncompleteFilters { missing }),
        }
    }

    /// Record the filter a filtered list was last fetched with.
    pub fn mark_applied(&mut self, filter: UserFilter) {
        self.applied = Some(filter);
    }

    /// Filter the current filtered list was fetched with.
    pub fn applied_filter(&self) -> Option<&UserFilter> {
        self.applied.as_ref()
    }

    /// Whether the selection moved away from the applied filter.
    ///
    /// A stale filtered list is only refreshed by an explicit filter action.
    pub fn is_filtered_stale(&self) -> bool {
        match &self.applied {
            None => false,
            Some(applied) => self.filter_criteria().map_or(true, |current| &current != applied),
        }
    }

    /// Clear every field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

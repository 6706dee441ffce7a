//! Region, country and city records plus their write inputs.
//!
//! The hierarchy is region → country → city. Each child holds a
//! [`Reference`] to its parent; the client does not enforce referential
//! integrity beyond validating the selected parent id on create.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, Reference};

/// Validation errors for region, country and city forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeographyValidationError {
    /// Region name blank.
    EmptyRegionName,
    /// Parent region missing or not a backend object id.
    InvalidRegion,
    /// Country name blank.
    EmptyCountryName,
    /// Parent country missing.
    InvalidCountry,
    /// City name blank.
    EmptyCityName,
}

impl fmt::Display for GeographyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRegionName => write!(f, "Please enter region name"),
            Self::InvalidRegion => write!(f, "Please select a valid region"),
            Self::EmptyCountryName => write!(f, "Please enter country name"),
            Self::InvalidCountry => write!(f, "Please select a valid country"),
            Self::EmptyCityName => write!(f, "Please enter city name"),
        }
    }
}

impl std::error::Error for GeographyValidationError {}

fn non_blank(
    value: &str,
    error: GeographyValidationError,
) -> Result<String, GeographyValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

/// Top level of the geographic hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Backend identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Whether the region is offered in selects.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Number of countries, when the backend aggregates it.
    pub total_countries: Option<u64>,
    /// Number of cities, when the backend aggregates it.
    pub total_cities: Option<u64>,
}

/// Country owned by a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    /// Backend identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// ISO-style country code, when known.
    pub code: Option<String>,
    /// Owning region.
    pub region: Reference,
    /// Whether the country is offered in selects.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

/// City owned by a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    /// Backend identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Owning country.
    pub country: Reference,
    /// Whether the city is offered in selects.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

/// Region creation input.
///
/// `is_active` is sent as given; no server default is assumed.
///
/// # Examples
/// ```
/// use dashboard::domain::NewRegion;
///
/// let region = NewRegion::try_new(" Test ", false).unwrap();
/// assert_eq!(region.name(), "Test");
/// assert!(!region.is_active());
/// assert!(NewRegion::try_new("  ", true).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegion {
    name: String,
    is_active: bool,
}

impl NewRegion {
    /// Validate the region form.
    pub fn try_new(name: &str, is_active: bool) -> Result<Self, GeographyValidationError> {
        Ok(Self {
            name: non_blank(name, GeographyValidationError::EmptyRegionName)?,
            is_active,
        })
    }

    /// Region name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requested active flag.
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

/// Partial region update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionUpdate {
    /// New name.
    pub name: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

impl RegionUpdate {
    /// Validate present fields.
    pub fn validate(&self) -> Result<(), GeographyValidationError> {
        if let Some(name) = &self.name {
            non_blank(name, GeographyValidationError::EmptyRegionName)?;
        }
        Ok(())
    }

    /// Apply present fields; used by in-memory adapters.
    pub fn apply_to(&self, region: &mut Region) {
        if let Some(name) = &self.name {
            region.name = name.trim().to_owned();
        }
        if let Some(active) = self.is_active {
            region.is_active = active;
        }
    }
}

/// Country creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCountry {
    region: EntityId,
    name: String,
    code: Option<String>,
    is_active: bool,
}

impl NewCountry {
    /// Validate the country form.
    ///
    /// The region must be selected and carry the backend object id shape; the
    /// region check runs first, matching the order of the form.
    pub fn try_new(
        region: Option<&EntityId>,
        name: &str,
        is_active: bool,
    ) -> Result<Self, GeographyValidationError> {
        let region = region
            .filter(|id| id.is_object_id())
            .ok_or(GeographyValidationError::InvalidRegion)?
            .clone();
        let name = non_blank(name, GeographyValidationError::EmptyCountryName)?;
        Ok(Self {
            region,
            name,
            code: None,
            is_active,
        })
    }

    /// Attach a country code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        self.code = Some(code.trim().to_uppercase()).filter(|value| !value.is_empty());
        self
    }

    /// Owning region.
    pub fn region(&self) -> &EntityId {
        &self.region
    }

    /// Country name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Country code, if any.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Requested active flag.
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

/// Partial country update; setting `region` moves the country.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryUpdate {
    /// New name.
    pub name: Option<String>,
    /// New country code.
    pub code: Option<String>,
    /// New owning region.
    pub region: Option<EntityId>,
    /// New active flag.
    pub is_active: Option<bool>,
}

impl CountryUpdate {
    /// Validate present fields.
    pub fn validate(&self) -> Result<(), GeographyValidationError> {
        if let Some(name) = &self.name {
            non_blank(name, GeographyValidationError::EmptyCountryName)?;
        }
        if self.region.as_ref().is_some_and(|id| !id.is_object_id()) {
            return Err(GeographyValidationError::InvalidRegion);
        }
        Ok(())
    }

    /// Apply present fields; used by in-memory adapters.
    pub fn apply_to(&self, country: &mut Country) {
        if let Some(name) = &self.name {
            country.name = name.trim().to_owned();
        }
        if let Some(code) = &self.code {
            country.code = Some(code.clone());
        }
        if let Some(region) = &self.region {
            country.region = Reference::new(region.clone());
        }
        if let Some(active) = self.is_active {
            country.is_active = active;
        }
    }
}

/// City creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCity {
    country: EntityId,
    name: String,
    is_active: bool,
}

impl NewCity {
    /// Validate the city form.
    pub fn try_new(
        country: Option<&EntityId>,
        name: &str,
        is_active: bool,
    ) -> Result<Self, GeographyValidationError> {
        let country = country
            .ok_or(GeographyValidationError::InvalidCountry)?
            .clone();
        let name = non_blank(name, GeographyValidationError::EmptyCityName)?;
        Ok(Self {
            country,
            name,
            is_active,
        })
    }

    /// Owning country.
    pub fn country(&self) -> &EntityId {
        &self.country
    }

    /// City name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requested active flag.
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

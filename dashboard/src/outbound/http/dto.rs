//! DTOs for the dashboard REST API.
//!
//! Responses decode into these transport DTOs first, then map into domain
//! records in one pass. References arrive either as bare ids or populated
//! objects; both collapse into [`Reference`] here. Request bodies borrow from
//! the validated domain inputs and carry the backend's field names.

use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};

use crate::domain::{
    City, Country, CountryUpdate, DemoProduct, DeviceType, EntityId, MappedProduct, NewCity,
    NewCountry, NewMapping, NewRegion, NewUser, OrgUnit, ProductUpdate, Reference, Region,
    RegionUpdate, User, UserType, UserUpdate,
};

fn entity_id(raw: String, field: &str) -> Result<EntityId, String> {
    EntityId::new(raw).map_err(|error| format!("{field}: {error}"))
}

/// Error body; only the message is used.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) message: Option<String>,
}

/// Write acknowledgement.
#[derive(Debug, Default, Deserialize)]
pub(super) struct AckDto {
    #[serde(default)]
    pub(super) message: Option<String>,
}

/// `{ data, message }` wrapper around a single payload.
#[derive(Debug, Deserialize)]
pub(super) struct DataEnvelopeDto<T> {
    pub(super) data: T,
    #[serde(default)]
    pub(super) message: Option<String>,
}

/// List endpoints answer either with a bare array or a `{ data }` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ListDto<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListDto<T> {
    pub(super) fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { data: items } => items,
        }
    }
}

/// Paged list envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub(super) struct PageEnvelopeDto<T> {
    #[serde(default)]
    pub(super) data: Vec<T>,
    #[serde(default)]
    pub(super) page: Option<u32>,
    #[serde(default)]
    pub(super) size: Option<u32>,
    #[serde(default)]
    pub(super) total_pages: Option<u32>,
    #[serde(default)]
    pub(super) total_count: Option<u64>,
}

impl<T> PageEnvelopeDto<T> {
    /// Map rows and fill missing totals from the request.
    pub(super) fn into_page<U>(
        self,
        request: PageRequest,
        f: impl FnMut(T) -> Result<U, String>,
    ) -> Result<Page<U>, String> {
        let items = self.data.into_iter().map(f).collect::<Result<Vec<_>, _>>()?;
        let count = u64::try_from(items.len()).unwrap_or(u64::MAX);
        Ok(Page {
            page: self.page.unwrap_or(request.page()),
            size: self.size.unwrap_or(request.size()),
            total_pages: self.total_pages.unwrap_or(1),
            total_count: self.total_count.unwrap_or(count),
            items,
        })
    }
}

/// Bare id or populated object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ReferenceDto {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        type_name: Option<String>,
    },
}

impl ReferenceDto {
    pub(super) fn into_domain(self, field: &str) -> Result<Reference, String> {
        match self {
            Self::Id(id) => Ok(Reference::new(entity_id(id, field)?)),
            Self::Populated {
                id,
                name,
                title,
                type_name,
            } => Ok(Reference::from_parts(
                entity_id(id, field)?,
                name.or(title).or(type_name),
            )),
        }
    }
}

fn optional_reference(
    value: Option<ReferenceDto>,
    field: &str,
) -> Result<Option<Reference>, String> {
    value.map(|dto| dto.into_domain(field)).transpose()
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "seS_id", default)]
    ses_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    is_active: bool,
    #[serde(rename = "isApproved", default)]
    is_approved: bool,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    designation: Option<String>,
    #[serde(default)]
    region_id: Option<ReferenceDto>,
    #[serde(default)]
    country_id: Option<ReferenceDto>,
    #[serde(default)]
    user_type_id: Option<ReferenceDto>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl UserDto {
    pub(super) fn into_domain(self) -> Result<User, String> {
        Ok(User {
            id: entity_id(self.id, "user _id")?,
            ses_id: self.ses_id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            is_active: self.is_active,
            is_approved: self.is_approved,
            department: self.department.unwrap_or_default(),
            designation: self.designation.unwrap_or_default(),
            region: optional_reference(self.region_id, "user region_id")?,
            country: optional_reference(self.country_id, "user country_id")?,
            user_type: optional_reference(self.user_type_id, "user user_type_id")?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginDataDto {
    token: String,
    user: UserDto,
}

impl LoginDataDto {
    pub(super) fn into_parts(self) -> Result<(String, User), String> {
        if self.token.trim().is_empty() {
            return Err("login token is empty".to_owned());
        }
        Ok((self.token, self.user.into_domain()?))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UserTypeDto {
    #[serde(rename = "_id")]
    id: String,
    type_name: String,
}

impl UserTypeDto {
    pub(super) fn into_domain(self) -> Result<UserType, String> {
        Ok(UserType {
            id: entity_id(self.id, "user type _id")?,
            type_name: self.type_name,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ActivationDataDto {
    pub(super) token: String,
    #[serde(default)]
    pub(super) expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub(super) struct VerifiedEmailDto {
    pub(super) token: String,
    #[serde(default)]
    pub(super) message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RegionDto {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(rename = "totalCountry", default)]
    total_country: Option<u64>,
    #[serde(rename = "totalCities", default)]
    total_cities: Option<u64>,
}

impl RegionDto {
    pub(super) fn into_domain(self) -> Result<Region, String> {
        Ok(Region {
            id: entity_id(self.id, "region _id")?,
            name: self.name.unwrap_or_default(),
            is_active: self.is_active,
            created_at: self.created_at,
            total_countries: self.total_country,
            total_cities: self.total_cities,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CountryDto {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(default)]
    country_code: Option<String>,
    region_id: ReferenceDto,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl CountryDto {
    pub(super) fn into_domain(self) -> Result<Country, String> {
        Ok(Country {
            id: entity_id(self.id, "country _id")?,
            name: self.name,
            code: self.country_code.filter(|code| !code.trim().is_empty()),
            region: self.region_id.into_domain("country region_id")?,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CityDto {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    country_id: ReferenceDto,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl CityDto {
    pub(super) fn into_domain(self) -> Result<City, String> {
        Ok(City {
            id: entity_id(self.id, "city _id")?,
            name: self.name,
            country: self.country_id.into_domain("city country_id")?,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct OrgUnitDto {
    #[serde(rename = "_id")]
    id: String,
    name: String,
}

impl OrgUnitDto {
    pub(super) fn into_domain(self) -> Result<OrgUnit, String> {
        Ok(OrgUnit {
            id: entity_id(self.id, "organization _id")?,
            name: self.name,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductDto {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    product_category_id: Option<ReferenceDto>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl ProductDto {
    pub(super) fn into_domain(self) -> Result<DemoProduct, String> {
        Ok(DemoProduct {
            id: entity_id(self.id, "product _id")?,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            image_url: self.image_url.filter(|url| !url.is_empty()),
            video_url: self.video_url.filter(|url| !url.is_empty()),
            category: optional_reference(self.product_category_id, "product_category_id")?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct MappingDto {
    #[serde(rename = "_id")]
    id: String,
    demo_product_id: ReferenceDto,
    user_id: ReferenceDto,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl MappingDto {
    pub(super) fn into_domain(self) -> Result<MappedProduct, String> {
        Ok(MappedProduct {
            id: entity_id(self.id, "mapping _id")?,
            product: self.demo_product_id.into_domain("mapping demo_product_id")?,
            user: self.user_id.into_domain("mapping user_id")?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct LoginRequestDto<'a> {
    #[serde(rename = "seS_id")]
    pub(super) ses_id: &'a str,
    pub(super) password: &'a str,
    pub(super) lat: f64,
    pub(super) log: f64,
    #[serde(rename = "deviceType")]
    pub(super) device_type: DeviceType,
}

#[derive(Debug, Serialize)]
pub(super) struct SesIdDto<'a> {
    #[serde(rename = "seS_id")]
    pub(super) ses_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct ResetPasswordDto<'a> {
    pub(super) token: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct EmailDto<'a> {
    pub(super) email: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct VerifyEmailDto<'a> {
    pub(super) email: &'a str,
    pub(super) otp: &'a str,
    pub(super) token: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct NewUserDto<'a> {
    user_type_id: &'a str,
    name: &'a str,
    email: &'a str,
    password: &'a str,
    #[serde(rename = "confirmPassword")]
    confirm_password: &'a str,
    #[serde(rename = "seS_id")]
    ses_id: &'a str,
    department: &'a str,
    designation: &'a str,
    region_id: &'a str,
    country_id: &'a str,
    is_active: bool,
    #[serde(rename = "isApproved")]
    is_approved: bool,
    #[serde(rename = "verificationToken", skip_serializing_if = "Option::is_none")]
    verification_token: Option<&'a str>,
}

impl<'a> From<&'a NewUser> for NewUserDto<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            user_type_id: user.user_type.as_str(),
            name: &user.name,
            email: &user.email,
            password: user.password.as_str(),
            confirm_password: user.password.as_str(),
            ses_id: &user.ses_id,
            department: &user.department,
            designation: &user.designation,
            region_id: user.region.as_str(),
            country_id: user.country.as_str(),
            is_active: user.is_active,
            is_approved: user.is_approved,
            verification_token: user.verification_token.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct UserUpdateDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_type_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    department: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    designation: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_active: Option<bool>,
    #[serde(rename = "isApproved", skip_serializing_if = "Option::is_none")]
    is_approved: Option<bool>,
}

impl<'a> From<&'a UserUpdate> for UserUpdateDto<'a> {
    fn from(update: &'a UserUpdate) -> Self {
        Self {
            user_type_id: update.user_type.as_ref().map(EntityId::as_str),
            name: update.name.as_deref(),
            email: update.email.as_deref(),
            password: update.password.as_ref().map(|password| password.as_str()),
            department: update.department.as_deref(),
            designation: update.designation.as_deref(),
            region_id: update.region.as_ref().map(EntityId::as_str),
            country_id: update.country.as_ref().map(EntityId::as_str),
            is_active: update.is_active,
            is_approved: update.is_approved,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RegionBodyDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_active: Option<bool>,
}

impl<'a> From<&'a NewRegion> for RegionBodyDto<'a> {
    fn from(region: &'a NewRegion) -> Self {
        Self {
            name: Some(region.name()),
            is_active: Some(region.is_active()),
        }
    }
}

impl<'a> From<&'a RegionUpdate> for RegionBodyDto<'a> {
    fn from(update: &'a RegionUpdate) -> Self {
        Self {
            name: update.name.as_deref(),
            is_active: update.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CountryBodyDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_active: Option<bool>,
}

impl<'a> From<&'a NewCountry> for CountryBodyDto<'a> {
    fn from(country: &'a NewCountry) -> Self {
        Self {
            name: Some(country.name()),
            country_code: country.code(),
            region_id: Some(country.region().as_str()),
            is_active: Some(country.is_active()),
        }
    }
}

impl<'a> From<&'a CountryUpdate> for CountryBodyDto<'a> {
    fn from(update: &'a CountryUpdate) -> Self {
        Self {
            name: update.name.as_deref(),
            country_code: update.code.as_deref(),
            region_id: update.region.as_ref().map(EntityId::as_str),
            is_active: update.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NewCityDto<'a> {
    name: &'a str,
    country_id: &'a str,
    is_active: bool,
}

impl<'a> From<&'a NewCity> for NewCityDto<'a> {
    fn from(city: &'a NewCity) -> Self {
        Self {
            name: city.name(),
            country_id: city.country().as_str(),
            is_active: city.is_active(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NameDto<'a> {
    pub(super) name: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductUpdateDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_category_id: Option<NameDto<'a>>,
}

impl<'a> From<&'a ProductUpdate> for ProductUpdateDto<'a> {
    fn from(update: &'a ProductUpdate) -> Self {
        Self {
            title: update.title.as_deref(),
            description: update.description.as_deref(),
            image_url: update.image_url.as_deref(),
            video_url: update.video_url.as_deref(),
            product_category_id: update.category_name.as_deref().map(|name| NameDto { name }),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NewMappingDto<'a> {
    demo_product_id: &'a str,
    user_id: &'a str,
}

impl<'a> From<&'a NewMapping> for NewMappingDto<'a> {
    fn from(mapping: &'a NewMapping) -> Self {
        Self {
            demo_product_id: mapping.product.as_str(),
            user_id: mapping.user.as_str(),
        }
    }
}

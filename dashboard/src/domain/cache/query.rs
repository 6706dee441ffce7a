//! Query keys, cached payloads and the tags each read provides.

use pagination::{Page, PageRequest};

use crate::domain::{
    City, Country, DemoProduct, EntityId, MappedProduct, OrgUnit, Region, User, UserFilter,
    UserType,
};

use super::{CacheTag, EntityKind};

/// Identity of one cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// One page of users.
    Users(PageRequest),
    /// Every user.
    AllUsers,
    /// Users matching a complete filter.
    FilteredUsers(UserFilter),
    /// User-type lookup.
    UserTypes,
    /// All regions.
    Regions,
    /// Countries of one region.
    Countries {
        /// Owning region.
        region: EntityId,
    },
    /// Cities of one country.
    Cities {
        /// Owning country.
        country: EntityId,
    },
    /// Department lookup.
    Departments,
    /// Designation lookup.
    Designations,
    /// One page of demo products.
    Products(PageRequest),
    /// One demo product.
    Product(EntityId),
    /// Every product-to-user mapping.
    Mappings,
}

impl QueryKey {
    /// Short name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Users(_) => "users",
            Self::AllUsers => "all_users",
            Self::FilteredUsers(_) => "filtered_users",
            Self::UserTypes => "user_types",
            Self::Regions => "regions",
            Self::Countries { .. } => "countries",
            Self::Cities { .. } => "cities",
            Self::Departments => "departments",
            Self::Designations => "designations",
            Self::Products(_) => "products",
            Self::Product(_) => "product",
            Self::Mappings => "mappings",
        }
    }

    /// Whether the key is one of many argument-varying reads of one list:
    /// a page, a filter or a single product.
    ///
    /// Unsubscribed entries for such keys are evicted instead of being kept
    /// stale.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Users(_) | Self::FilteredUsers(_) | Self::Products(_) | Self::Product(_)
        )
    }

    /// Tags provided by this read.
    ///
    /// Without data (the read failed or has not completed) only the list
    /// level tag is provided; with data every returned record adds its item
    /// tag.
    pub fn provided_tags(&self, data: Option<&QueryData>) -> Vec<CacheTag> {
        let mut tags = vec![self.base_tag()];
        if let Some(data) = data {
            let kind = self.base_tag().kind();
            tags.extend(
                data.item_ids()
                    .into_iter()
                    .map(|id| CacheTag::item(kind, id)),
            );
        }
        tags
    }

    fn base_tag(&self) -> CacheTag {
        match self {
            Self::Users(_) | Self::AllUsers => CacheTag::list(EntityKind::User),
            Self::FilteredUsers(_) => CacheTag::list(EntityKind::FilteredUsers),
            Self::UserTypes => CacheTag::list(EntityKind::UserType),
            Self::Regions => CacheTag::list(EntityKind::Region),
            Self::Countries { region } => CacheTag::for_region(EntityKind::Country, region.clone()),
            Self::Cities { country } => CacheTag::for_country(EntityKind::City, country.clone()),
            Self::Departments => CacheTag::list(EntityKind::Department),
            Self::Designations => CacheTag::list(EntityKind::Designation),
            Self::Products(_) => CacheTag::list(EntityKind::DemoProduct),
            Self::Product(id) => CacheTag::item(EntityKind::DemoProduct, id.clone()),
            Self::Mappings => CacheTag::list(EntityKind::MappedProduct),
        }
    }
}

/// Payload stored for a [`QueryKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryData {
    /// Paginated users.
    UserPage(Page<User>),
    /// Unpaginated users.
    Users(Vec<User>),
    /// User types.
    UserTypes(Vec<UserType>),
    /// Regions.
    Regions(Vec<Region>),
    /// Countries.
    Countries(Vec<Country>),
    /// Cities.
    Cities(Vec<City>),
    /// Departments or designations.
    OrgUnits(Vec<OrgUnit>),
    /// Paginated demo products.
    ProductPage(Page<DemoProduct>),
    /// A single demo product.
    Product(DemoProduct),
    /// Mappings.
    Mappings(Vec<MappedProduct>),
}

impl QueryData {
    fn item_ids(&self) -> Vec<EntityId> {
        match self {
            Self::UserPage(page) => page.items.iter().map(|u| u.id.clone()).collect(),
            Self::Users(users) => users.iter().map(|u| u.id.clone()).collect(),
            Self::Regions(regions) => regions.iter().map(|r| r.id.clone()).collect(),
            Self::Countries(countries) => countries.iter().map(|c| c.id.clone()).collect(),
            Self::Cities(cities) => cities.iter().map(|c| c.id.clone()).collect(),
            Self::ProductPage(page) => page.items.iter().map(|p| p.id.clone()).collect(),
            Self::UserTypes(_) | Self::OrgUnits(_) | Self::Product(_) | Self::Mappings(_) => {
                Vec::new()
            }
        }
    }

    /// Variant name for diagnostics.
    pub fn variant(&self) -> &'static str {
        match self {
            Self::UserPage(_) => "UserPage",
            Self::Users(_) => "Users",
            Self::UserTypes(_) => "UserTypes",
            Self::Regions(_) => "Regions",
            Self::Countries(_) => "Countries",
            Self::Cities(_) => "Cities",
            Self::OrgUnits(_) => "OrgUnits",
            Self::ProductPage(_) => "ProductPage",
            Self::Product(_) => "Product",
            Self::Mappings(_) => "Mappings",
        }
    }
}

/// Typed view of a [`QueryData`] variant.
pub trait QueryPayload: Sized {
    /// Wrap a typed payload for storage.
    fn into_data(self) -> QueryData;
    /// Extract the typed payload, or hand the data back on variant mismatch.
    fn from_data(data: QueryData) -> Result<Self, QueryData>;
}

macro_rules! query_payload {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl QueryPayload for $ty {
                fn into_data(self) -> QueryData {
                    QueryData::$variant(self)
                }

                fn from_data(data: QueryData) -> Result<Self, QueryData> {
                    match data {
                        QueryData::$variant(value) => Ok(value),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

query_payload! {
    Page<User> => UserPage,
    Vec<User> => Users,
    Vec<UserType> => UserTypes,
    Vec<Region> => Regions,
    Vec<Country> => Countries,
    Vec<City> => Cities,
    Vec<OrgUnit> => OrgUnits,
    Page<DemoProduct> => ProductPage,
    DemoProduct => Product,
    Vec<MappedProduct> => Mappings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Reference;
    use rstest::rstest;

    fn id(value: &str) -> EntityId {
        EntityId::new(value).expect("valid id")
    }

    fn country(country: &str, region: &str) -> Country {
        Country {
            id: id(country),
            name: country.to_uppercase(),
            code: None,
            region: Reference::new(id(region)),
            is_active: true,
            created_at: None,
        }
    }

    #[rstest]
    fn failed_reads_provide_only_the_list_tag() {
        let key = QueryKey::Countries { region: id("a") };
        let tags: Vec<String> = key.provided_tags(None).iter().map(ToString::to_string).collect();
        assert_eq!(tags, ["Country:LIST_FOR_REGION_a"]);
    }

    #[rstest]
    fn successful_reads_add_item_tags() {
        let key = QueryKey::Countries { region: id("a") };
        let data = QueryData::Countries(vec![country("fr", "a"), country("de", "a")]);
        let tags: Vec<String> = key
            .provided_tags(Some(&data))
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(tags, ["Country:LIST_FOR_REGION_a", "Country:fr", "Country:de"]);
    }

    #[rstest]
    #[case(QueryKey::AllUsers, "User:LIST")]
    #[case(QueryKey::Users(PageRequest::default()), "User:LIST")]
    #[case(QueryKey::Mappings, "MappedProduct:LIST")]
    #[case(QueryKey::Product(id("p1")), "DemoProduct:p1")]
    fn keys_provide_base_tags(#[case] key: QueryKey, #[case] expected: &str) {
        let tags = key.provided_tags(None);
        assert_eq!(tags.first().map(ToString::to_string).as_deref(), Some(expected));
    }

    #[rstest]
    fn payload_round_trips_and_rejects_other_variants() {
        let data = vec![country("fr", "a")].into_data();
        let back = Vec::<Country>::from_data(data).expect("countries");
        assert_eq!(back.len(), 1);

        let regions = QueryData::Regions(Vec::new());
        let err = Vec::<Country>::from_data(regions).expect_err("mismatch");
        assert_eq!(err.variant(), "Regions");
    }
}

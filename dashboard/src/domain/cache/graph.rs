//! Invalidation graph: which tags each successful write makes stale.
//!
//! Every write the dashboard can issue is a [`Mutation`]; its tag set is
//! computed here in one place instead of next to each endpoint.

use crate::domain::{EntityId, OrgUnitKind};

use super::{CacheTag, EntityKind};

/// A successful write, described by the ids its invalidation depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// User registered or created by an administrator.
    CreateUser,
    /// User profile, role, activation or approval changed.
    UpdateUser {
        /// Updated user.
        id: EntityId,
    },
    /// User deleted.
    DeleteUser {
        /// Deleted user.
        id: EntityId,
    },
    /// Region created.
    CreateRegion,
    /// Region renamed or toggled.
    UpdateRegion {
        /// Updated region.
        id: EntityId,
    },
    /// Region deleted.
    DeleteRegion {
        /// Deleted region.
        id: EntityId,
    },
    /// Country created under `region`.
    CreateCountry {
        /// Owning region.
        region: EntityId,
    },
    /// Country updated, possibly moved to another region.
    UpdateCountry {
        /// Updated country.
        id: EntityId,
        /// Region the cached copy belonged to before the write, if known.
        previous_region: Option<EntityId>,
        /// Region named by the write, when it sets one.
        new_region: Option<EntityId>,
    },
    /// City created under `country`.
    CreateCity {
        /// Owning country.
        country: EntityId,
    },
    /// Department or designation added one at a time or imported in bulk.
    ChangeOrgUnits(OrgUnitKind),
    /// Demo product edited.
    UpdateProduct {
        /// Edited product.
        id: EntityId,
    },
    /// Demo product deleted.
    DeleteProduct {
        /// Deleted product.
        id: EntityId,
    },
    /// Product assigned to a user.
    CreateMapping,
    /// Assignment removed.
    DeleteMapping,
}

impl Mutation {
    /// Short name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateUser => "create_user",
            Self::UpdateUser { .. } => "update_user",
            Self::DeleteUser { .. } => "delete_user",
            Self::CreateRegion => "create_region",
            Self::UpdateRegion { .. } => "update_region",
            Self::DeleteRegion { .. } => "delete_region",
            Self::CreateCountry { .. } => "create_country",
            Self::UpdateCountry { .. } => "update_country",
            Self::CreateCity { .. } => "create_city",
            Self::ChangeOrgUnits(_) => "change_org_units",
            Self::UpdateProduct { .. } => "update_product",
            Self::DeleteProduct { .. } => "delete_product",
            Self::CreateMapping => "create_mapping",
            Self::DeleteMapping => "delete_mapping",
        }
    }

    /// Tags made stale by this write.
    ///
    /// User writes leave the filtered user list alone; it is refreshed only
    /// by an explicit filter action.
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::{EntityId, Mutation};
    ///
    /// let id = |v: &str| EntityId::new(v).unwrap();
    /// let moved = Mutation::UpdateCountry {
    ///     id: id("c1"),
    ///     previous_region: Some(id("a")),
    ///     new_region: Some(id("b")),
    /// };
    /// let tags: Vec<String> = moved.invalidated_tags().iter().map(ToString::to_string).collect();
    /// assert_eq!(tags, ["Country:c1", "Country:LIST_FOR_REGION_b", "Country:LIST_FOR_REGION_a"]);
    /// ```
    pub fn invalidated_tags(&self) -> Vec<CacheTag> {
        match self {
            Self::CreateUser | Self::UpdateUser { .. } | Self::DeleteUser { .. } => {
                vec![CacheTag::all(EntityKind::User)]
            }
            Self::CreateRegion => vec![CacheTag::list(EntityKind::Region)],
            Self::UpdateRegion { id } | Self::DeleteRegion { id } => vec![
                CacheTag::item(EntityKind::Region, id.clone()),
                CacheTag::list(EntityKind::Region),
            ],
            Self::CreateCountry { region } => {
                vec![CacheTag::for_region(EntityKind::Country, region.clone())]
            }
            Self::UpdateCountry {
                id,
                previous_region,
                new_region,
            } => country_update_tags(id, previous_region.as_ref(), new_region.as_ref()),
            Self::CreateCity { country } => {
                vec![CacheTag::for_country(EntityKind::City, country.clone())]
            }
            Self::ChangeOrgUnits(OrgUnitKind::Department) => {
                vec![CacheTag::all(EntityKind::Department)]
            }
            Self::ChangeOrgUnits(OrgUnitKind::Designation) => {
                vec![CacheTag::all(EntityKind::Designation)]
            }
            Self::UpdateProduct { id } | Self::DeleteProduct { id } => vec![
                CacheTag::item(EntityKind::DemoProduct, id.clone()),
                CacheTag::list(EntityKind::DemoProduct),
            ],
            Self::CreateMapping | Self::DeleteMapping => {
                vec![CacheTag::all(EntityKind::MappedProduct)]
            }
        }
    }
}

fn country_update_tags(
    id: &EntityId,
    previous_region: Option<&EntityId>,
    new_region: Option<&EntityId>,
) -> Vec<CacheTag> {
    let mut tags = vec![CacheTag::item(EntityKind::Country, id.clone())];
    if let Some(region) = new_region {
        tags.push(CacheTag::for_region(EntityKind::Country, region.clone()));
    }
    if let (Some(old), Some(new)) = (previous_region, new_region) {
        if old != new {
            tags.push(CacheTag::for_region(EntityKind::Country, old.clone()));
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn id(value: &str) -> EntityId {
        EntityId::new(value).expect("valid id")
    }

    fn rendered(mutation: &Mutation) -> Vec<String> {
        mutation
            .invalidated_tags()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[rstest]
    #[case(Mutation::CreateUser, &["User"])]
    #[case(Mutation::DeleteUser { id: id("u1") }, &["User"])]
    #[case(Mutation::CreateRegion, &["Region:LIST"])]
    #[case(Mutation::UpdateRegion { id: id("r1") }, &["Region:r1", "Region:LIST"])]
    #[case(Mutation::DeleteRegion { id: id("r1") }, &["Region:r1", "Region:LIST"])]
    #[case(Mutation::CreateCountry { region: id("r1") }, &["Country:LIST_FOR_REGION_r1"])]
    #[case(Mutation::CreateCity { country: id("c1") }, &["City:LIST_FOR_COUNTRY_c1"])]
    #[case(Mutation::ChangeOrgUnits(OrgUnitKind::Department), &["Department"])]
    #[case(Mutation::ChangeOrgUnits(OrgUnitKind::Designation), &["Designation"])]
    #[case(Mutation::UpdateProduct { id: id("p1") }, &["DemoProduct:p1", "DemoProduct:LIST"])]
    #[case(Mutation::CreateMapping, &["MappedProduct"])]
    #[case(Mutation::DeleteMapping, &["MappedProduct"])]
    fn graph_lists_invalidated_tags(#[case] mutation: Mutation, #[case] expected: &[&str]) {
        assert_eq!(rendered(&mutation), expected);
    }

    #[rstest]
    fn country_rename_touches_only_the_item() {
        let rename = Mutation::UpdateCountry {
            id: id("c1"),
            previous_region: Some(id("a")),
            new_region: None,
        };
        assert_eq!(rendered(&rename), ["Country:c1"]);
    }

    #[rstest]
    fn country_update_within_same_region_lists_region_once() {
        let update = Mutation::UpdateCountry {
            id: id("c1"),
            previous_region: Some(id("a")),
            new_region: Some(id("a")),
        };
        assert_eq!(rendered(&update), ["Country:c1", "Country:LIST_FOR_REGION_a"]);
    }

    #[rstest]
    fn user_writes_leave_filtered_users_alone() {
        let filtered = CacheTag::list(EntityKind::FilteredUsers);
        let tags = Mutation::UpdateUser { id: id("u1") }.invalidated_tags();
        assert!(tags.iter().all(|tag| !tag.matches(&filtered)));
    }
}

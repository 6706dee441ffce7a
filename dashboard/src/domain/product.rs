//! Demo products and their assignments to users.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, Reference};

/// Demo content shown to employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoProduct {
    /// Backend identifier.
    pub id: EntityId,
    /// Title shown on cards and in the assignment select.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Thumbnail location.
    pub image_url: Option<String>,
    /// Video or WebGL bundle location.
    pub video_url: Option<String>,
    /// Product category.
    pub category: Option<Reference>,
    /// Upload timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

/// Raised when a product edit is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    /// Title blank after trimming.
    EmptyTitle,
    /// Nothing to change.
    NoChanges,
}

impl fmt::Display for ProductValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Title is required"),
            Self::NoChanges => write!(f, "Nothing to update"),
        }
    }
}

impl std::error::Error for ProductValidationError {}

/// Partial product edit.
///
/// Media fields carry locations of files already uploaded to storage; the
/// upload itself happens elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New thumbnail location.
    pub image_url: Option<String>,
    /// New video or WebGL location.
    pub video_url: Option<String>,
    /// New category name.
    pub category_name: Option<String>,
}

impl ProductUpdate {
    /// Validate present fields.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self == &Self::default() {
            return Err(ProductValidationError::NoChanges);
        }
        if self.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
            return Err(ProductValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Apply present fields; used by in-memory adapters.
    pub fn apply_to(&self, product: &mut DemoProduct) {
        if let Some(title) = &self.title {
            product.title = title.trim().to_owned();
        }
        if let Some(description) = &self.description {
            product.description.clone_from(description);
        }
        if let Some(image) = &self.image_url {
            product.image_url = Some(image.clone());
        }
        if let Some(video) = &self.video_url {
            product.video_url = Some(video.clone());
        }
        if let Some(name) = &self.category_name {
            product.category = product
                .category
                .as_ref()
                .map(|category| Reference::named(category.id().clone(), name.clone()));
        }
    }
}

/// Assignment of one demo product to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedProduct {
    /// Backend identifier of the mapping.
    pub id: EntityId,
    /// Assigned product.
    pub product: Reference,
    /// Receiving user.
    pub user: Reference,
    /// Assignment timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

/// Request to assign `product` to `user`.
///
/// No uniqueness check is made; the same pair may be submitted twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewMapping {
    /// Product to assign.
    pub product: EntityId,
    /// Receiving user.
    pub user: EntityId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn product() -> DemoProduct {
        DemoProduct {
            id: EntityId::new("p1").expect("id"),
            title: "Smart Panel".into(),
            description: "Walkthrough".into(),
            image_url: None,
            video_url: None,
            category: Some(Reference::named(EntityId::new("cat1").expect("id"), "Energy")),
            created_at: None,
        }
    }

    #[rstest]
    #[case(ProductUpdate::default(), Err(ProductValidationError::NoChanges))]
    #[case(
        ProductUpdate { title: Some(" ".into()), ..ProductUpdate::default() },
        Err(ProductValidationError::EmptyTitle)
    )]
    #[case(
        ProductUpdate { description: Some("New".into()), ..ProductUpdate::default() },
        Ok(())
    )]
    fn validates_edits(
        #[case] update: ProductUpdate,
        #[case] expected: Result<(), ProductValidationError>,
    ) {
        assert_eq!(update.validate(), expected);
    }

    #[rstest]
    fn category_rename_keeps_category_id() {
        let mut product = product();
        let update = ProductUpdate {
            category_name: Some("Buildings".into()),
            ..ProductUpdate::default()
        };
        update.apply_to(&mut product);
        let category = product.category.expect("category");
        assert_eq!(category.id().as_str(), "cat1");
        assert_eq!(category.name(), Some("Buildings"));
    }
}

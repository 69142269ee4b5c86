//! Catalogue products and the garment categories they belong to.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ProductId;
use super::account::required_text;

/// Garment category shared by products and measurement types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum GarmentCategory {
    SchoolUniform,
    SportsWear,
    CorporateWear,
    CasualWear,
}

/// Category a product is listed under.
pub type ProductCategory = GarmentCategory;

impl GarmentCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [
        Self::SchoolUniform,
        Self::SportsWear,
        Self::CorporateWear,
        Self::CasualWear,
    ];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SchoolUniform => "school_uniform",
            Self::SportsWear => "sports_wear",
            Self::CorporateWear => "corporate_wear",
            Self::CasualWear => "casual_wear",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::SchoolUniform => "School Uniform",
            Self::SportsWear => "Sports Wear",
            Self::CorporateWear => "Corporate Wear",
            Self::CasualWear => "Casual Wear",
        }
    }
}

impl fmt::Display for GarmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category paired with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CategorySummary {
    pub value: GarmentCategory,
    pub label: &'static str,
}

impl From<GarmentCategory> for CategorySummary {
    fn from(value: GarmentCategory) -> Self {
        Self {
            value,
            label: value.label(),
        }
    }
}

/// Raised when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown garment category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for GarmentCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// Validation failures for product inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductValidationError {
    /// A required text field was blank.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Wire name of the offending field.
        field: &'static str,
    },
    /// Price must be positive.
    #[error("price must be greater than zero")]
    ZeroPrice,
}

impl ProductValidationError {
    /// Wire name of the field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyField { field } => field,
            Self::ZeroPrice => "price",
        }
    }
}

fn product_text(value: &str, field: &'static str) -> Result<String, ProductValidationError> {
    required_text(value, field).map_err(|_| ProductValidationError::EmptyField { field })
}

fn product_price(price: u64) -> Result<u64, ProductValidationError> {
    if price == 0 {
        Err(ProductValidationError::ZeroPrice)
    } else {
        Ok(price)
    }
}

/// Catalogue item. Prices are whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: ProductCategory,
    pub description: String,
    #[schema(example = 1200)]
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub category: ProductCategory,
    pub description: String,
    pub price: u64,
    pub image: Option<String>,
}

impl ProductDraft {
    /// Validate raw product fields.
    pub fn try_new(
        name: &str,
        category: ProductCategory,
        description: &str,
        price: u64,
        image: Option<&str>,
    ) -> Result<Self, ProductValidationError> {
        Ok(Self {
            name: product_text(name, "name")?,
            category,
            description: description.trim().to_owned(),
            price: product_price(price)?,
            image: image.map(str::trim).filter(|i| !i.is_empty()).map(str::to_owned),
        })
    }
}

/// Partial product update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<ProductCategory>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub image: Option<String>,
}

impl ProductPatch {
    /// Validate the supplied fields of a partial update.
    pub fn try_new(
        name: Option<&str>,
        category: Option<ProductCategory>,
        description: Option<&str>,
        price: Option<u64>,
        image: Option<&str>,
    ) -> Result<Self, ProductValidationError> {
        Ok(Self {
            name: name.map(|n| product_text(n, "name")).transpose()?,
            category,
            description: description.map(|d| d.trim().to_owned()),
            price: price.map(product_price).transpose()?,
            image: image.map(|i| i.trim().to_owned()),
        })
    }
}

impl Product {
    /// Create a record from a validated draft.
    pub fn new(id: ProductId, draft: ProductDraft, now: DateTime<Utc>) -> Self {
        let ProductDraft {
            name,
            category,
            description,
            price,
            image,
        } = draft;
        Self {
            id,
            name,
            category,
            description,
            price,
            image,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update. An empty image string clears the image.
    pub fn apply(&mut self, patch: ProductPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(image) = patch.image {
            self.image = Some(image).filter(|i| !i.is_empty());
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn category_round_trips_through_strings() {
        for category in GarmentCategory::ALL {
            assert_eq!(category.as_str().parse::<GarmentCategory>(), Ok(category));
        }
        assert!("formal_wear".parse::<GarmentCategory>().is_err());
    }

    #[rstest]
    #[case("", 100, "name")]
    #[case("Shirt", 0, "price")]
    fn draft_validation(#[case] name: &str, #[case] price: u64, #[case] field: &str) {
        let err = ProductDraft::try_new(name, GarmentCategory::CasualWear, "", price, None)
            .expect_err("invalid draft");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn empty_image_in_patch_clears_image() {
        let now = Utc::now();
        let draft = ProductDraft::try_new(
            "Shirt",
            GarmentCategory::CasualWear,
            "Cotton",
            600,
            Some("shirt.png"),
        )
        .expect("valid");
        let mut product = Product::new(ProductId::generate(), draft, now);
        let patch = ProductPatch::try_new(None, None, None, Some(650), Some("")).expect("valid");
        product.apply(patch, now);
        assert_eq!(product.price, 650);
        assert!(product.image.is_none());
    }
}

//! Driving port for the product catalogue.

use async_trait::async_trait;

use crate::domain::{
    CategorySummary, Error, Principal, Product, ProductCategory, ProductDraft, ProductId,
    ProductPatch,
};

/// Domain use-case port for browsing and curating products.
///
/// Reads are public; writes require a super admin.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Products, optionally filtered by exact category.
    async fn list(&self, category: Option<ProductCategory>) -> Result<Vec<Product>, Error>;

    /// The fixed category list with labels.
    fn categories(&self) -> Vec<CategorySummary>;

    /// One product.
    async fn get(&self, id: &ProductId) -> Result<Product, Error>;

    /// Add a product.
    async fn create(&self, principal: &Principal, draft: ProductDraft) -> Result<Product, Error>;

    /// Partially update a product.
    async fn update(
        &self,
        principal: &Principal,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Product, Error>;

    /// Remove a product. Existing orders keep their snapshot.
    async fn delete(&self, principal: &Principal, id: &ProductId) -> Result<(), Error>;
}

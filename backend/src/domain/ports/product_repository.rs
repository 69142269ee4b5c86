//! Port abstraction for the product catalogue.
use async_trait::async_trait;

use crate::domain::{Product, ProductCategory, ProductId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by product repository adapters.
    pub enum ProductRepositoryError {
        /// The backing store could not complete the operation.
        Query { message: String } => "product repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Products in insertion order, optionally restricted to one category.
    async fn list(
        &self,
        category: Option<ProductCategory>,
    ) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Fetch a product by id.
    async fn find(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError>;

    /// Store a new product.
    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError>;

    /// Overwrite an existing product. Returns `false` when absent.
    async fn update(&self, product: &Product) -> Result<bool, ProductRepositoryError>;

    /// Remove a product. Returns `false` when absent.
    async fn delete(&self, id: &ProductId) -> Result<bool, ProductRepositoryError>;
}

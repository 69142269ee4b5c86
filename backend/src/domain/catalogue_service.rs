//! Product catalogue domain service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::port_errors::product_error;
use super::ports::{ProductRepository, ProductsService};
use super::{
    CategorySummary, Error, GarmentCategory, Principal, Product, ProductCategory, ProductDraft,
    ProductId, ProductPatch,
};

/// Catalogue service implementing [`ProductsService`].
#[derive(Clone)]
pub struct CatalogueService<P> {
    products: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<P> CatalogueService<P> {
    /// Create a new service over a product repository.
    pub fn new(products: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self { products, clock }
    }
}

impl<P: ProductRepository> CatalogueService<P> {
    async fn require_product(&self, id: &ProductId) -> Result<Product, Error> {
        self.products
            .find(id)
            .await
            .map_err(product_error)?
            .ok_or_else(|| Error::not_found("Product not found"))
    }
}

#[async_trait]
impl<P: ProductRepository> ProductsService for CatalogueService<P> {
    async fn list(&self, category: Option<ProductCategory>) -> Result<Vec<Product>, Error> {
        self.products.list(category).await.map_err(product_error)
    }

    fn categories(&self) -> Vec<CategorySummary> {
        GarmentCategory::ALL.into_iter().map(CategorySummary::from).collect()
    }

    async fn get(&self, id: &ProductId) -> Result<Product, Error> {
        self.require_product(id).await
    }

    async fn create(&self, principal: &Principal, draft: ProductDraft) -> Result<Product, Error> {
        principal.require_super_admin()?;
        let product = Product::new(ProductId::generate(), draft, self.clock.utc());
        self.products
            .insert(&product)
            .await
            .map_err(product_error)?;
        info!(product_id = %product.id, category = %product.category, "product created");
        Ok(product)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Product, Error> {
        principal.require_super_admin()?;
        let mut product = self.require_product(id).await?;
        product.apply(patch, self.clock.utc());
        if !self
            .products
            .update(&product)
            .await
            .map_err(product_error)?
        {
            return Err(Error::not_found("Product not found"));
        }
        info!(product_id = %id, "product updated");
        Ok(product)
    }

    async fn delete(&self, principal: &Principal, id: &ProductId) -> Result<(), Error> {
        principal.require_super_admin()?;
        if !self.products.delete(id).await.map_err(product_error)? {
            return Err(Error::not_found("Product not found"));
        }
        info!(product_id = %id, "product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockProductRepository;
    use crate::domain::service_test_helpers::{fixture_clock, fixture_timestamp, individual, super_admin};
    use rstest::rstest;

    fn service(products: MockProductRepository) -> CatalogueService<MockProductRepository> {
        CatalogueService::new(Arc::new(products), fixture_clock())
    }

    fn draft() -> ProductDraft {
        ProductDraft::try_new(
            "Sports Jersey",
            GarmentCategory::SportsWear,
            "Breathable polyester jersey",
            900,
            None,
        )
        .expect("draft")
    }

    #[rstest]
    fn categories_cover_every_garment_category() {
        let service = service(MockProductRepository::new());
        let categories = service.categories();
        assert_eq!(categories.len(), 4);
        assert_eq!(categories[0].label, "School Uniform");
    }

    #[rstest]
    #[tokio::test]
    async fn list_passes_category_filter_through() {
        let mut products = MockProductRepository::new();
        products
            .expect_list()
            .withf(|category| *category == Some(GarmentCategory::CasualWear))
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let listed = service(products)
            .list(Some(GarmentCategory::CasualWear))
            .await
            .expect("list");
        assert!(listed.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn only_super_admins_create_products() {
        let mut products = MockProductRepository::new();
        products.expect_insert().never();
        let err = service(products)
            .create(&individual("ind-001"), draft())
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn create_stamps_clock_time() {
        let mut products = MockProductRepository::new();
        products.expect_insert().times(1).returning(|_| Ok(()));
        let product = service(products)
            .create(&super_admin(), draft())
            .await
            .expect("created");
        assert_eq!(product.created_at, fixture_timestamp());
        assert!(product.id.as_str().starts_with("prod-"));
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_missing_product_is_not_found() {
        let mut products = MockProductRepository::new();
        products.expect_delete().returning(|_| Ok(false));
        let err = service(products)
            .delete(&super_admin(), &ProductId::new("prod-999").expect("id"))
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}

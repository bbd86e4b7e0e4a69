use axum_helpers::{Page, PageRequest};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CategoryInput, CategorySort, Product, ProductInput, ProductSort, ProductSummary,
};
use crate::repository::{CategoryRepository, ProductRepository};

/// Service layer for category use cases
#[derive(Clone)]
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list(&self, request: PageRequest<CategorySort>) -> CatalogResult<Page<Category>> {
        self.repository.find_all(request).await
    }

    pub async fn get(&self, id: Uuid) -> CatalogResult<Category> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    pub async fn create(&self, input: CategoryInput) -> CatalogResult<Category> {
        input.validate()?;
        self.repository.create(input).await
    }

    pub async fn update(&self, id: Uuid, input: CategoryInput) -> CatalogResult<Category> {
        input.validate()?;
        self.repository.update(id, input).await
    }

    /// Delete a category; fails with `Integrity` while products reference it
    pub async fn delete(&self, id: Uuid) -> CatalogResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CatalogError::CategoryNotFound(id));
        }
        Ok(())
    }
}

/// Service layer for product use cases
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list(
        &self,
        request: PageRequest<ProductSort>,
    ) -> CatalogResult<Page<ProductSummary>> {
        self.repository.find_all(request).await
    }

    pub async fn get(&self, id: Uuid) -> CatalogResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))
    }

    /// Create a product; every referenced category must exist
    pub async fn create(&self, input: ProductInput) -> CatalogResult<Product> {
        input.validate()?;
        self.repository.create(input).await
    }

    /// Replace a product's fields and category set
    pub async fn update(&self, id: Uuid, input: ProductInput) -> CatalogResult<Product> {
        input.validate()?;
        self.repository.update(id, input).await
    }

    pub async fn delete(&self, id: Uuid) -> CatalogResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CatalogError::ProductNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reference;
    use crate::repository::{MockCategoryRepository, MockProductRepository};
    use chrono::Utc;
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    fn product_input(name: &str) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: String::new(),
            price: Decimal::new(49990, 2),
            img_url: String::new(),
            date: None,
            categories: vec![Reference { id: Uuid::now_v7() }],
        }
    }

    #[tokio::test]
    async fn test_get_missing_category_is_not_found() {
        let mut mock_repo = MockCategoryRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_find_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let service = CategoryService::new(mock_repo);
        let err = service.get(id).await.unwrap_err();

        assert!(matches!(err, CatalogError::CategoryNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_delete_missing_category_is_not_found() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo.expect_delete().returning(|_| Ok(false));

        let service = CategoryService::new(mock_repo);
        let err = service.delete(Uuid::now_v7()).await.unwrap_err();

        assert!(matches!(err, CatalogError::CategoryNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_referenced_category_propagates_integrity() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_delete()
            .returning(|_| Err(CatalogError::Integrity("referenced".to_string())));

        let service = CategoryService::new(mock_repo);
        let err = service.delete(Uuid::now_v7()).await.unwrap_err();

        assert!(matches!(err, CatalogError::Integrity(_)));
    }

    #[tokio::test]
    async fn test_invalid_category_never_reaches_repository() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo.expect_create().never();

        let service = CategoryService::new(mock_repo);
        let err = service
            .create(CategoryInput {
                name: String::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_category_delegates() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo.expect_create().times(1).returning(|input| {
            let now = Utc::now();
            Ok(Category {
                id: Uuid::now_v7(),
                name: input.name,
                created_at: now,
                updated_at: now,
            })
        });

        let service = CategoryService::new(mock_repo);
        let category = service
            .create(CategoryInput {
                name: "Electronics".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(category.name, "Electronics");
    }

    #[tokio::test]
    async fn test_product_without_categories_is_rejected() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let mut input = product_input("PS5");
        input.categories.clear();

        let service = ProductService::new(mock_repo);
        let err = service.create(input).await.unwrap_err();

        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_update()
            .withf(move |candidate, _| *candidate == id)
            .returning(|id, _| Err(CatalogError::ProductNotFound(id)));

        let service = ProductService::new(mock_repo);
        let err = service.update(id, product_input("PS5")).await.unwrap_err();

        assert!(matches!(err, CatalogError::ProductNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_delete_product() {
        let mut mock_repo = MockProductRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_delete()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(true));

        let service = ProductService::new(mock_repo);
        assert!(service.delete(id).await.is_ok());
    }
}

use async_trait::async_trait;
use axum_helpers::{Direction, Page, PageRequest};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CategoryInput, CategorySort, CategorySummary, Product, ProductInput, ProductSort,
    ProductSummary,
};

/// Repository trait for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>>;

    async fn find_all(&self, request: PageRequest<CategorySort>) -> CatalogResult<Page<Category>>;

    async fn create(&self, input: CategoryInput) -> CatalogResult<Category>;

    /// Rename a category; `CategoryNotFound` if absent
    async fn update(&self, id: Uuid, input: CategoryInput) -> CatalogResult<Category>;

    /// Delete a category; `Integrity` if a product still references it
    async fn delete(&self, id: Uuid) -> CatalogResult<bool>;

    async fn exists(&self, id: Uuid) -> CatalogResult<bool>;
}

/// Repository trait for Product persistence
///
/// Category references are resolved inside the write; an unknown id fails
/// with `CategoryNotFound` and nothing is stored.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>>;

    async fn find_all(
        &self,
        request: PageRequest<ProductSort>,
    ) -> CatalogResult<Page<ProductSummary>>;

    async fn create(&self, input: ProductInput) -> CatalogResult<Product>;

    /// Overwrite every mutable field; `ProductNotFound` if absent
    async fn update(&self, id: Uuid, input: ProductInput) -> CatalogResult<Product>;

    async fn delete(&self, id: Uuid) -> CatalogResult<bool>;

    async fn exists(&self, id: Uuid) -> CatalogResult<bool>;
}

#[derive(Debug, Clone)]
struct StoredProduct {
    id: Uuid,
    name: String,
    description: String,
    price: Decimal,
    img_url: String,
    date: DateTime<Utc>,
    category_ids: BTreeSet<Uuid>,
}

#[derive(Debug, Default)]
struct CatalogStore {
    categories: HashMap<Uuid, Category>,
    products: HashMap<Uuid, StoredProduct>,
}

impl CatalogStore {
    fn resolve(&self, ids: &BTreeSet<Uuid>) -> CatalogResult<()> {
        match ids.iter().find(|id| !self.categories.contains_key(id)) {
            Some(missing) => Err(CatalogError::CategoryNotFound(*missing)),
            None => Ok(()),
        }
    }

    fn project(&self, stored: &StoredProduct) -> Product {
        let mut categories: Vec<CategorySummary> = stored
            .category_ids
            .iter()
            .filter_map(|id| self.categories.get(id))
            .cloned()
            .map(Into::into)
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));

        Product {
            id: stored.id,
            name: stored.name.clone(),
            description: stored.description.clone(),
            price: stored.price,
            img_url: stored.img_url.clone(),
            date: stored.date,
            categories,
        }
    }
}

fn directed(ordering: Ordering, direction: Direction) -> Ordering {
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

/// In-memory catalog (for development/testing)
///
/// Categories and products share one store so that deleting a referenced
/// category is refused the same way the database refuses it. Clone the
/// handle to back both services.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    store: Arc<RwLock<CatalogStore>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalog {
    async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>> {
        let store = self.store.read().await;
        Ok(store.categories.get(&id).cloned())
    }

    async fn find_all(&self, request: PageRequest<CategorySort>) -> CatalogResult<Page<Category>> {
        let store = self.store.read().await;
        let mut categories: Vec<Category> = store.categories.values().cloned().collect();

        categories.sort_by(|a, b| {
            let ordering = match request.sort {
                CategorySort::Id => a.id.cmp(&b.id),
                CategorySort::Name => a.name.cmp(&b.name),
                CategorySort::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            directed(ordering, request.direction).then_with(|| a.id.cmp(&b.id))
        });

        Ok(Page::slice(categories, &request))
    }

    async fn create(&self, input: CategoryInput) -> CatalogResult<Category> {
        let mut store = self.store.write().await;
        let now = Utc::now();
        let category = Category {
            id: Uuid::now_v7(),
            name: input.name.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        store.categories.insert(category.id, category.clone());

        tracing::info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    async fn update(&self, id: Uuid, input: CategoryInput) -> CatalogResult<Category> {
        let mut store = self.store.write().await;
        let category = store
            .categories
            .get_mut(&id)
            .ok_or(CatalogError::CategoryNotFound(id))?;

        category.name = input.name.trim().to_string();
        category.updated_at = Utc::now();
        let updated = category.clone();

        tracing::info!(category_id = %id, "Updated category");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let mut store = self.store.write().await;

        if store
            .products
            .values()
            .any(|p| p.category_ids.contains(&id))
        {
            return Err(CatalogError::Integrity(format!(
                "category {} is referenced by a product",
                id
            )));
        }

        let deleted = store.categories.remove(&id).is_some();
        if deleted {
            tracing::info!(category_id = %id, "Deleted category");
        }
        Ok(deleted)
    }

    async fn exists(&self, id: Uuid) -> CatalogResult<bool> {
        let store = self.store.read().await;
        Ok(store.categories.contains_key(&id))
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let store = self.store.read().await;
        Ok(store.products.get(&id).map(|p| store.project(p)))
    }

    async fn find_all(
        &self,
        request: PageRequest<ProductSort>,
    ) -> CatalogResult<Page<ProductSummary>> {
        let store = self.store.read().await;
        let mut products: Vec<&StoredProduct> = store.products.values().collect();

        products.sort_by(|a, b| {
            let ordering = match request.sort {
                ProductSort::Id => a.id.cmp(&b.id),
                ProductSort::Name => a.name.cmp(&b.name),
                ProductSort::Price => a.price.cmp(&b.price),
                ProductSort::Date => a.date.cmp(&b.date),
            };
            directed(ordering, request.direction).then_with(|| a.id.cmp(&b.id))
        });

        let summaries = products
            .into_iter()
            .map(|p| ProductSummary {
                id: p.id,
                name: p.name.clone(),
                price: p.price,
                img_url: p.img_url.clone(),
            })
            .collect();

        Ok(Page::slice(summaries, &request))
    }

    async fn create(&self, input: ProductInput) -> CatalogResult<Product> {
        let mut store = self.store.write().await;
        let category_ids = input.category_ids();
        store.resolve(&category_ids)?;

        let stored = StoredProduct {
            id: Uuid::now_v7(),
            name: input.name.trim().to_string(),
            description: input.description,
            price: input.price,
            img_url: input.img_url,
            date: input.date.unwrap_or_else(Utc::now),
            category_ids,
        };
        let product = store.project(&stored);
        store.products.insert(stored.id, stored);

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn update(&self, id: Uuid, input: ProductInput) -> CatalogResult<Product> {
        let mut store = self.store.write().await;
        let current_date = store
            .products
            .get(&id)
            .ok_or(CatalogError::ProductNotFound(id))?
            .date;

        let category_ids = input.category_ids();
        store.resolve(&category_ids)?;

        let stored = StoredProduct {
            id,
            name: input.name.trim().to_string(),
            description: input.description,
            price: input.price,
            img_url: input.img_url,
            date: input.date.unwrap_or(current_date),
            category_ids,
        };
        let product = store.project(&stored);
        store.products.insert(id, stored);

        tracing::info!(product_id = %id, "Updated product");
        Ok(product)
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let mut store = self.store.write().await;
        let deleted = store.products.remove(&id).is_some();
        if deleted {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(deleted)
    }

    async fn exists(&self, id: Uuid) -> CatalogResult<bool> {
        let store = self.store.read().await;
        Ok(store.products.contains_key(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reference;

    fn category(name: &str) -> CategoryInput {
        CategoryInput {
            name: name.to_string(),
        }
    }

    fn product(name: &str, price: i64, categories: &[Uuid]) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: format!("{name} description"),
            price: Decimal::new(price, 2),
            img_url: String::new(),
            date: None,
            categories: categories.iter().map(|&id| Reference { id }).collect(),
        }
    }

    #[tokio::test]
    async fn test_product_round_trip_includes_categories() {
        let catalog = InMemoryCatalog::new();
        let electronics = CategoryRepository::create(&catalog, category("Electronics"))
            .await
            .unwrap();
        let games = CategoryRepository::create(&catalog, category("Games"))
            .await
            .unwrap();

        let created = ProductRepository::create(
            &catalog,
            product("PS5", 49990, &[games.id, electronics.id, games.id]),
        )
        .await
        .unwrap();

        let fetched = ProductRepository::find_by_id(&catalog, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched, created);
        let names: Vec<_> = fetched.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Electronics", "Games"]);
    }

    #[tokio::test]
    async fn test_unknown_category_leaves_no_product() {
        let catalog = InMemoryCatalog::new();
        let missing = Uuid::now_v7();

        let err = ProductRepository::create(&catalog, product("PS5", 100, &[missing]))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::CategoryNotFound(id) if id == missing));

        let page = ProductRepository::find_all(&catalog, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 0);
    }

    #[tokio::test]
    async fn test_referenced_category_cannot_be_deleted() {
        let catalog = InMemoryCatalog::new();
        let electronics = CategoryRepository::create(&catalog, category("Electronics"))
            .await
            .unwrap();
        let ps5 = ProductRepository::create(&catalog, product("PS5", 100, &[electronics.id]))
            .await
            .unwrap();

        let err = CategoryRepository::delete(&catalog, electronics.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Integrity(_)));
        assert!(CategoryRepository::exists(&catalog, electronics.id).await.unwrap());

        assert!(ProductRepository::delete(&catalog, ps5.id).await.unwrap());
        assert!(CategoryRepository::delete(&catalog, electronics.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_product_writes_nothing() {
        let catalog = InMemoryCatalog::new();
        let electronics = CategoryRepository::create(&catalog, category("Electronics"))
            .await
            .unwrap();
        let missing = Uuid::now_v7();

        let err = ProductRepository::update(&catalog, missing, product("PS5", 1, &[electronics.id]))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::ProductNotFound(_)));
        assert!(!ProductRepository::exists(&catalog, missing).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_keeps_date_when_omitted() {
        let catalog = InMemoryCatalog::new();
        let electronics = CategoryRepository::create(&catalog, category("Electronics"))
            .await
            .unwrap();
        let created = ProductRepository::create(&catalog, product("PS5", 100, &[electronics.id]))
            .await
            .unwrap();

        let updated =
            ProductRepository::update(&catalog, created.id, product("PS5 Pro", 200, &[electronics.id]))
                .await
                .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "PS5 Pro");
        assert_eq!(updated.date, created.date);
    }

    #[tokio::test]
    async fn test_find_all_sorts_and_pages() {
        let catalog = InMemoryCatalog::new();
        let electronics = CategoryRepository::create(&catalog, category("Electronics"))
            .await
            .unwrap();
        for (name, price) in [("Xbox", 300), ("Camera", 900), ("Laptop", 500)] {
            ProductRepository::create(&catalog, product(name, price, &[electronics.id]))
                .await
                .unwrap();
        }

        let by_name = ProductRepository::find_all(
            &catalog,
            PageRequest::new(0, 2, ProductSort::Name, Direction::Asc),
        )
        .await
        .unwrap();
        let names: Vec<_> = by_name.content.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Camera", "Laptop"]);
        assert_eq!(by_name.total_pages, 2);

        let by_price = ProductRepository::find_all(
            &catalog,
            PageRequest::new(0, 12, ProductSort::Price, Direction::Desc),
        )
        .await
        .unwrap();
        assert_eq!(by_price.content[0].name, "Camera");

        let beyond = ProductRepository::find_all(
            &catalog,
            PageRequest::new(3, 2, ProductSort::Name, Direction::Asc),
        )
        .await
        .unwrap();
        assert!(beyond.content.is_empty());
        assert_eq!(beyond.total_elements, 3);
    }

    #[tokio::test]
    async fn test_category_update_trims_name() {
        let catalog = InMemoryCatalog::new();
        let created = CategoryRepository::create(&catalog, category("Books"))
            .await
            .unwrap();
        let updated = CategoryRepository::update(&catalog, created.id, category("  Comics "))
            .await
            .unwrap();
        assert_eq!(updated.name, "Comics");
        assert!(updated.updated_at >= created.updated_at);
    }
}

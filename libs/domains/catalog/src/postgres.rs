use async_trait::async_trait;
use axum_helpers::{Direction, Page, PageRequest};
use chrono::Utc;
use database::postgres::{ConstraintViolation, constraint_violation};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, ModelTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::{
    entity::{category, product, product_category},
    error::{CatalogError, CatalogResult},
    models::{
        Category, CategoryInput, CategorySort, Product, ProductInput, ProductSort, ProductSummary,
    },
    repository::{CategoryRepository, ProductRepository},
};

fn map_db_err(err: DbErr) -> CatalogError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::ForeignKey(detail)) => CatalogError::Integrity(detail),
        _ => CatalogError::Internal(format!("Database error: {}", err)),
    }
}

fn order(direction: Direction) -> Order {
    match direction {
        Direction::Asc => Order::Asc,
        Direction::Desc => Order::Desc,
    }
}

pub struct PgCategoryRepository {
    db: DatabaseConnection,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>> {
        let model = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.map(Into::into))
    }

    async fn find_all(&self, request: PageRequest<CategorySort>) -> CatalogResult<Page<Category>> {
        let column = match request.sort {
            CategorySort::Id => category::Column::Id,
            CategorySort::Name => category::Column::Name,
            CategorySort::CreatedAt => category::Column::CreatedAt,
        };

        let paginator = category::Entity::find()
            .order_by(column, order(request.direction))
            .order_by_asc(category::Column::Id)
            .paginate(&self.db, request.size);

        let totals = paginator.num_items_and_pages().await.map_err(map_db_err)?;
        let models = if request.is_past_end(totals.number_of_items) {
            Vec::new()
        } else {
            paginator
                .fetch_page(request.page)
                .await
                .map_err(map_db_err)?
        };

        Ok(Page::new(
            models.into_iter().map(Into::into).collect(),
            request.page,
            request.size,
            totals.number_of_items,
        ))
    }

    async fn create(&self, input: CategoryInput) -> CatalogResult<Category> {
        let now = Utc::now();
        let active_model = category::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name.trim().to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;

        tracing::info!(category_id = %model.id, "Created category");
        Ok(model.into())
    }

    async fn update(&self, id: Uuid, input: CategoryInput) -> CatalogResult<Category> {
        let model = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(CatalogError::CategoryNotFound(id))?;

        let mut active_model = model.into_active_model();
        active_model.name = Set(input.name.trim().to_string());
        active_model.updated_at = Set(Utc::now().into());

        let updated = active_model.update(&self.db).await.map_err(map_db_err)?;

        tracing::info!(category_id = %id, "Updated category");
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let result = category::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(category_id = %id, "Deleted category");
        }
        Ok(deleted)
    }

    async fn exists(&self, id: Uuid) -> CatalogResult<bool> {
        let count = category::Entity::find_by_id(id)
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }
}

pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads the referenced categories, failing on the first id with no row.
    async fn resolve_categories<C: ConnectionTrait>(
        conn: &C,
        ids: &BTreeSet<Uuid>,
    ) -> CatalogResult<Vec<category::Model>> {
        let found = category::Entity::find()
            .filter(category::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(category::Column::Name)
            .all(conn)
            .await
            .map_err(map_db_err)?;

        if found.len() != ids.len() {
            let known: BTreeSet<Uuid> = found.iter().map(|c| c.id).collect();
            if let Some(missing) = ids.difference(&known).next() {
                return Err(CatalogError::CategoryNotFound(*missing));
            }
        }

        Ok(found)
    }

    async fn link_categories<C: ConnectionTrait>(
        conn: &C,
        product_id: Uuid,
        categories: &[category::Model],
    ) -> CatalogResult<()> {
        if categories.is_empty() {
            return Ok(());
        }

        let rows = categories.iter().map(|c| product_category::ActiveModel {
            product_id: Set(product_id),
            category_id: Set(c.id),
        });

        product_category::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let Some(model) = product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let categories = model
            .find_related(category::Entity)
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(Some(model.into_product(categories)))
    }

    async fn find_all(
        &self,
        request: PageRequest<ProductSort>,
    ) -> CatalogResult<Page<ProductSummary>> {
        let column = match request.sort {
            ProductSort::Id => product::Column::Id,
            ProductSort::Name => product::Column::Name,
            ProductSort::Price => product::Column::Price,
            ProductSort::Date => product::Column::Date,
        };

        let paginator = product::Entity::find()
            .order_by(column, order(request.direction))
            .order_by_asc(product::Column::Id)
            .paginate(&self.db, request.size);

        let totals = paginator.num_items_and_pages().await.map_err(map_db_err)?;
        let models = if request.is_past_end(totals.number_of_items) {
            Vec::new()
        } else {
            paginator
                .fetch_page(request.page)
                .await
                .map_err(map_db_err)?
        };

        Ok(Page::new(
            models.into_iter().map(Into::into).collect(),
            request.page,
            request.size,
            totals.number_of_items,
        ))
    }

    async fn create(&self, input: ProductInput) -> CatalogResult<Product> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let categories = Self::resolve_categories(&txn, &input.category_ids()).await?;

        let now = Utc::now();
        let active_model = product::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name.trim().to_string()),
            description: Set(input.description),
            price: Set(input.price),
            img_url: Set(input.img_url),
            date: Set(input.date.unwrap_or(now).into()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let model = active_model.insert(&txn).await.map_err(map_db_err)?;
        Self::link_categories(&txn, model.id, &categories).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(product_id = %model.id, "Created product");
        Ok(model.into_product(categories))
    }

    async fn update(&self, id: Uuid, input: ProductInput) -> CatalogResult<Product> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let existing = product::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(CatalogError::ProductNotFound(id))?;
        let categories = Self::resolve_categories(&txn, &input.category_ids()).await?;

        let current_date = existing.date;
        let mut active_model = existing.into_active_model();
        active_model.name = Set(input.name.trim().to_string());
        active_model.description = Set(input.description);
        active_model.price = Set(input.price);
        active_model.img_url = Set(input.img_url);
        active_model.date = Set(input.date.map(Into::into).unwrap_or(current_date));
        active_model.updated_at = Set(Utc::now().into());

        let model = active_model.update(&txn).await.map_err(map_db_err)?;

        product_category::Entity::delete_many()
            .filter(product_category::Column::ProductId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        Self::link_categories(&txn, id, &categories).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(model.into_product(categories))
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        // Join rows cascade with the product
        let result = product::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(deleted)
    }

    async fn exists(&self, id: Uuid) -> CatalogResult<bool> {
        let count = product::Entity::find_by_id(id)
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }
}

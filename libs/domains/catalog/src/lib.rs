//! Catalog Domain
//!
//! Categories and products, linked many-to-many. A product always belongs to
//! at least one category, and a category cannot be deleted while a product
//! still references it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /categories, /products
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, not-found semantics
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← InMemoryCatalog | PgCategoryRepository, PgProductRepository
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Entity    │  ← SeaORM models + join table
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{
//!     handlers, repository::InMemoryCatalog, CategoryService, ProductService,
//! };
//!
//! let catalog = InMemoryCatalog::new();
//! let categories = handlers::categories::router(CategoryService::new(catalog.clone()));
//! let products = handlers::products::router(ProductService::new(catalog));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult};
pub use models::{
    Category, CategoryInput, CategorySort, CategorySummary, Product, ProductInput, ProductSort,
    ProductSummary, Reference,
};
pub use postgres::{PgCategoryRepository, PgProductRepository};
pub use repository::{CategoryRepository, InMemoryCatalog, ProductRepository};
pub use service::{CategoryService, ProductService};

//! SeaORM entities for the catalog tables.

pub mod category;
pub mod product;
pub mod product_category;

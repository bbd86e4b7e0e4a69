use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("Required field")));
    }
    Ok(())
}

/// Largest price a `NUMERIC(12,2)` column holds.
pub const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

fn product_name(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if !(3..=60).contains(&value.trim().chars().count()) {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("Name must be between 3 and 60 characters")));
    }
    Ok(())
}

fn price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("range")
            .with_message(Cow::Borrowed("Price must not be negative")));
    }
    if *price > MAX_PRICE {
        return Err(ValidationError::new("range")
            .with_message(Cow::Borrowed("Price must be at most 9999999999.99")));
    }
    if price.normalize().scale() > 2 {
        return Err(ValidationError::new("scale")
            .with_message(Cow::Borrowed("Price must have at most 2 decimal places")));
    }
    Ok(())
}

/// Product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for creating or renaming a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CategoryInput {
    #[validate(
        custom(function = "not_blank"),
        length(max = 60, message = "Name must be at most 60 characters")
    )]
    #[schema(example = "Electronics")]
    pub name: String,
}

/// Category as embedded in a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
}

impl From<Category> for CategorySummary {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

/// Reference to an existing record by id; other fields are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Reference {
    pub id: Uuid,
}

/// Full product projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[schema(value_type = f64, example = 499.90)]
    pub price: Decimal,
    pub img_url: String,
    /// Availability date
    pub date: DateTime<Utc>,
    pub categories: Vec<CategorySummary>,
}

/// List projection without description and categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = f64, example = 499.90)]
    pub price: Decimal,
    pub img_url: String,
}

impl From<Product> for ProductSummary {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            img_url: product.img_url,
        }
    }
}

/// Body for creating or replacing a product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductInput {
    #[validate(custom(function = "product_name"))]
    #[schema(example = "PS5", min_length = 3, max_length = 60)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "price"))]
    #[schema(value_type = f64, example = 499.90, minimum = 0, maximum = 9999999999.99)]
    pub price: Decimal,
    #[serde(default)]
    pub img_url: String,
    /// Availability date; defaults to now on create and is kept on update
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "Must contain at least one category"))]
    pub categories: Vec<Reference>,
}

impl ProductInput {
    /// Distinct category ids, duplicates collapsed
    pub fn category_ids(&self) -> BTreeSet<Uuid> {
        self.categories.iter().map(|c| c.id).collect()
    }
}

/// Sortable category fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum CategorySort {
    Id,
    #[default]
    Name,
    CreatedAt,
}

/// Sortable product fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ProductSort {
    Id,
    #[default]
    Name,
    Price,
    Date,
}

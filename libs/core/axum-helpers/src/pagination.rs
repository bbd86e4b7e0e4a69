//! Page/size/sort parameters and the paged response envelope.

use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: u64 = 12;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Sort direction, parsed case-insensitively from `ASC`/`DESC`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Raw pagination query parameters.
///
/// `linesPerPage` and `orderBy` are accepted as aliases of `size` and `sort`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Zero-based page index
    #[serde(default)]
    #[param(default = 0, minimum = 0)]
    pub page: u64,
    /// Page size (1..=100)
    #[serde(default = "default_size", alias = "linesPerPage")]
    #[param(default = 12, minimum = 1, maximum = 100)]
    pub size: u64,
    /// Field to sort by
    #[serde(default = "default_sort", alias = "orderBy")]
    #[param(default = "name")]
    pub sort: String,
    /// `ASC` or `DESC`
    #[serde(default)]
    #[param(default = "ASC")]
    pub direction: Option<String>,
}

fn default_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn default_sort() -> String {
    "name".to_string()
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: default_sort(),
            direction: None,
        }
    }
}

impl PageParams {
    /// Checks bounds and resolves `sort` against the field whitelist `F`.
    pub fn into_request<F: FromStr>(self) -> Result<PageRequest<F>, AppError> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.size) {
            return Err(AppError::BadRequest(format!(
                "Page size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let sort = F::from_str(&self.sort)
            .map_err(|_| AppError::BadRequest(format!("Unknown sort field: {}", self.sort)))?;

        let direction = match self.direction.as_deref() {
            None => Direction::Asc,
            Some(raw) => Direction::from_str(raw)
                .map_err(|_| AppError::BadRequest(format!("Unknown sort direction: {}", raw)))?,
        };

        Ok(PageRequest {
            page: self.page,
            size: self.size,
            sort,
            direction,
        })
    }
}

/// Validated pagination request for sort field type `F`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<F> {
    pub page: u64,
    pub size: u64,
    pub sort: F,
    pub direction: Direction,
}

impl<F> PageRequest<F> {
    pub fn new(page: u64, size: u64, sort: F, direction: Direction) -> Self {
        Self {
            page,
            size,
            sort,
            direction,
        }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// True when the requested page starts at or after the last of `total` rows.
    pub fn is_past_end(&self, total: u64) -> bool {
        self.page
            .checked_mul(self.size)
            .is_none_or(|offset| offset >= total)
    }
}

impl<F: Default> Default for PageRequest<F> {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE, F::default(), Direction::Asc)
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    /// Zero-based index of this page
    pub number: u64,
    pub size: u64,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, number: u64, size: u64, total_elements: u64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            total_elements.div_ceil(size)
        };

        Self {
            content,
            total_elements,
            total_pages,
            number,
            size,
            first: number == 0,
            last: number >= total_pages.saturating_sub(1),
        }
    }

    /// Cuts the requested page out of an already sorted collection.
    pub fn slice<F>(items: Vec<T>, request: &PageRequest<F>) -> Self {
        let total = items.len() as u64;
        let content = items
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size as usize)
            .collect();
        Self::new(content, request.page, request.size, total)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
            first: self.first,
            last: self.last,
        }
    }
}

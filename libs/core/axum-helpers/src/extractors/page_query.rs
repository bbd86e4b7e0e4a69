//! Pagination query extractor.

use crate::errors::AppError;
use crate::pagination::{PageParams, PageRequest};
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use std::str::FromStr;

/// Extracts `page`, `size`, `sort` and `direction` and resolves the sort
/// field against the whitelist `F`.
///
/// Unknown sort fields, out-of-range sizes and malformed numbers are all
/// rejected with 400.
pub struct PageQuery<F>(pub PageRequest<F>);

impl<F, S> FromRequestParts<S> for PageQuery<F>
where
    F: FromStr,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PageParams>::from_request_parts(parts, state).await?;
        Ok(PageQuery(params.into_request()?))
    }
}

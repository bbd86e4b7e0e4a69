//! HTTP endpoints for the catalog.
//!
//! Reads go through [`Reader`](axum_helpers::Reader) so they honor the
//! configured catalog read access; writes require `ROLE_ADMIN`.

pub mod categories;
pub mod products;

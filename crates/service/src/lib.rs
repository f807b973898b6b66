//! Service layer for the CRUD pipeline.
//! - Normalizes wire-side string ids into store-side integer ids.
//! - Applies the single default-value rule (order status).
//! - Delegates everything else to per-resource repository contracts.
pub mod domain;
pub mod errors;
pub mod order;
pub mod product;
pub mod user;

#[cfg(test)]
mod test_support;

//! SeaORM entities for the three stored resources plus the pooled
//! database connector. Entities mirror the table layout one to one;
//! wire-shaped types live in the server crate.
pub mod db;
pub mod order;
pub mod product;
pub mod user;

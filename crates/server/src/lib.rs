pub mod errors;
pub mod graphql;
pub mod openapi;
pub mod routes;
pub mod startup;

pub use startup::{run, run_graphql};

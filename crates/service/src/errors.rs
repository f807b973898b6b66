use thiserror::Error;

/// Errors surfaced by the service layer. Store failures stay opaque:
/// there is no dedicated not-found variant, an absent row is just a
/// `Db` message the handlers map by presence, not by content.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid id: {0}")]
    Parse(String),
    #[error("database error: {0}")]
    Db(String),
}

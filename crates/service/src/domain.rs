use serde::{Deserialize, Serialize};

/// In-process representation of a stored user. The id is the store's
/// integer identity re-stringified for the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
}

/// References are raw identifiers, never hydrated entities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total_price: f64,
    pub status: String,
}

use crate::entities::product_entity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub stock: i32,
    /// Minor currency unit
    pub price: i32,
}

/// Listing shape: enough to render a catalogue row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub uuid: Uuid,
    pub name: String,
    pub price: i32,
}

impl From<product_entity::Model> for ProductSummary {
    fn from(m: product_entity::Model) -> Self {
        Self {
            uuid: m.uuid,
            name: m.name,
            price: m.price,
        }
    }
}

use crate::entities::{order_entity, order_item_entity};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product details frozen into the order at fulfillment time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_uuid: Uuid,
    pub name: String,
    pub description: String,
    pub price: i32,
    pub qty: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub user_uuid: Uuid,
    pub amount: i32,
    pub items: Vec<OrderItemInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    pub order: order_entity::Model,
    pub items: Vec<order_item_entity::Model>,
}

impl OrderItemInput {
    pub fn into_active_model(self, order_uuid: Uuid) -> order_item_entity::ActiveModel {
        use sea_orm::Set;

        order_item_entity::ActiveModel {
            order_uuid: Set(order_uuid),
            product_uuid: Set(self.product_uuid),
            name: Set(self.name),
            description: Set(self.description),
            price: Set(self.price),
            qty: Set(self.qty),
        }
    }
}

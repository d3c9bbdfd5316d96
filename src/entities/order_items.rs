use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Snapshot of a product at the moment the order was fulfilled. Keyed by
/// `(order_uuid, product_uuid)` and never updated after insert.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_uuid: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_uuid: Uuid,
    pub name: String,
    pub description: String,
    pub price: i32,
    pub qty: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderUuid",
        to = "super::orders::Column::Uuid"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductUuid",
        to = "super::products::Column::Uuid"
    )]
    Product,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A cart line. `transaction_uuid` is null while the line is still pending and
/// is set once the line is committed to a transaction at checkout.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction_cart")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub user_uuid: Uuid,
    pub qty: i32,
    pub transaction_uuid: Option<Uuid>,
}

impl Model {
    pub fn is_pending(&self) -> bool {
        self.transaction_uuid.is_none()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductUuid",
        to = "super::products::Column::Uuid"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserUuid",
        to = "super::users::Column::Uuid"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionUuid",
        to = "super::transactions::Column::Uuid"
    )]
    Transaction,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

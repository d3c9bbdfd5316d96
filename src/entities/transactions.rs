use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a transaction. Stored as plain text; the column itself
/// accepts any string.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "UNPAID")]
    Unpaid,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "EXPIRED")]
    Expired,
    #[sea_orm(string_value = "FAILED")]
    Failed,
}

impl TransactionStatus {
    /// Only an unpaid transaction still holds its virtual account open for payment.
    pub fn is_open(&self) -> bool {
        matches!(self, TransactionStatus::Unpaid)
    }

    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        self.is_open() && next != TransactionStatus::Unpaid
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Unpaid => write!(f, "UNPAID"),
            TransactionStatus::Paid => write!(f, "PAID"),
            TransactionStatus::Expired => write!(f, "EXPIRED"),
            TransactionStatus::Failed => write!(f, "FAILED"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uuid: Uuid,
    pub user_uuid: Uuid,
    pub status: TransactionStatus,
    pub amount: i32,
    pub created: DateTime<Utc>,
    pub expired: DateTime<Utc>,
    pub payment_method: String,
    pub virtual_account: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserUuid",
        to = "super::users::Column::Uuid"
    )]
    User,
    #[sea_orm(has_many = "super::transaction_carts::Entity")]
    TransactionCarts,
    #[sea_orm(has_many = "super::transaction_payments::Entity")]
    TransactionPayments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::transaction_carts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionCarts.def()
    }
}

impl Related<super::transaction_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionPayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

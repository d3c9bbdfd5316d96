use crate::entities::{
    transaction_cart_entity, transaction_entity, transaction_payment_entity,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBillingRequest {
    pub user_uuid: Uuid,
    /// Total to collect, computed by the caller
    pub amount: i32,
    pub payment_method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPaymentRequest {
    pub transaction_uuid: Uuid,
    /// Gateway reference for this payment event
    pub reference: String,
    pub amount: i32,
    pub payment_datetime: DateTime<Utc>,
}

/// A transaction together with the cart lines committed to it.
#[derive(Debug, Clone, Serialize)]
pub struct BillingDetail {
    pub transaction: transaction_entity::Model,
    pub items: Vec<transaction_cart_entity::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub payment: transaction_payment_entity::Model,
    pub transaction: transaction_entity::Model,
}

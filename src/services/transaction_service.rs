use crate::config::CheckoutConfig;
use crate::entities::{
    TransactionStatus, transaction_cart_entity as carts, transaction_entity as transactions,
    transaction_payment_entity as payments,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::schema::SchemaRegistry;
use crate::utils::{generate_virtual_account, time};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityName, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct TransactionService {
    pool: DatabaseConnection,
    registry: Arc<SchemaRegistry>,
    checkout: CheckoutConfig,
}

impl TransactionService {
    pub fn new(
        pool: DatabaseConnection,
        registry: Arc<SchemaRegistry>,
        checkout: CheckoutConfig,
    ) -> Self {
        Self {
            pool,
            registry,
            checkout,
        }
    }

    /// True when the error is a clash on `(payment_method, virtual_account)`.
    fn is_virtual_account_collision(&self, err: &AppError) -> bool {
        let AppError::DuplicateKey(name) = err else {
            return false;
        };
        self.registry
            .table(transactions::Entity.table_name())
            .is_some_and(|t| t.unique_keys.iter().any(|k| &k.name == name))
    }

    /// Open a billing for every pending cart line of the user.
    ///
    /// The transaction row and the cart lines it claims are written in one
    /// database transaction. A virtual account that collides with an existing
    /// one for the same payment method is regenerated up to
    /// `virtual_account_retries` times before the duplicate-key error is
    /// returned.
    pub async fn create_billing(&self, request: CreateBillingRequest) -> AppResult<BillingDetail> {
        self.open_billing(request).await.inspect_err(AppError::log)
    }

    async fn open_billing(&self, request: CreateBillingRequest) -> AppResult<BillingDetail> {
        self.registry
            .enforce(transactions::Column::Amount, request.amount.into())?;
        let payment_method = request.payment_method.trim().to_string();
        if payment_method.is_empty() {
            return Err(AppError::ValidationError(
                "Payment method must not be empty".to_string(),
            ));
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            let virtual_account = generate_virtual_account(self.checkout.virtual_account_length);
            match self
                .insert_billing(&request, &payment_method, virtual_account)
                .await
            {
                Err(err)
                    if self.is_virtual_account_collision(&err)
                        && attempt <= self.checkout.virtual_account_retries =>
                {
                    log::warn!(
                        "Virtual account collision for {payment_method} on attempt {attempt}, retrying"
                    );
                }
                result => return result,
            }
        }
    }

    async fn insert_billing(
        &self,
        request: &CreateBillingRequest,
        payment_method: &str,
        virtual_account: String,
    ) -> AppResult<BillingDetail> {
        let created = time::now();
        let expired = self.checkout.billing_expiry(created)?;

        let txn = self.pool.begin().await?;

        let pending = carts::Entity::find()
            .filter(carts::Column::UserUuid.eq(request.user_uuid))
            .filter(carts::Column::TransactionUuid.is_null())
            .all(&txn)
            .await?;
        if pending.is_empty() {
            return Err(AppError::ValidationError("Cart is empty".to_string()));
        }

        let transaction = transactions::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            user_uuid: Set(request.user_uuid),
            status: Set(TransactionStatus::Unpaid),
            amount: Set(request.amount),
            created: Set(created),
            expired: Set(expired),
            payment_method: Set(payment_method.to_string()),
            virtual_account: Set(virtual_account),
        }
        .insert(&txn)
        .await
        .map_err(|e| self.registry.classify(e.into()))?;

        carts::Entity::update_many()
            .col_expr(carts::Column::TransactionUuid, Expr::value(transaction.uuid))
            .filter(carts::Column::UserUuid.eq(request.user_uuid))
            .filter(carts::Column::TransactionUuid.is_null())
            .exec(&txn)
            .await?;

        let items = carts::Entity::find()
            .filter(carts::Column::TransactionUuid.eq(transaction.uuid))
            .order_by_asc(carts::Column::Uuid)
            .all(&txn)
            .await?;

        txn.commit().await?;
        log::info!(
            "Created billing {} for user {} ({} lines, amount {})",
            transaction.uuid,
            transaction.user_uuid,
            items.len(),
            transaction.amount
        );
        Ok(BillingDetail { transaction, items })
    }

    pub async fn get(&self, uuid: Uuid) -> AppResult<transactions::Model> {
        transactions::Entity::find_by_id(uuid)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))
    }

    /// Look a billing up the way a payer refers to it: by payment method and
    /// virtual account, scoped to the owning user.
    pub async fn get_billing(
        &self,
        user_uuid: Uuid,
        payment_method: &str,
        virtual_account: &str,
    ) -> AppResult<BillingDetail> {
        let transaction = transactions::Entity::find()
            .filter(transactions::Column::PaymentMethod.eq(payment_method))
            .filter(transactions::Column::VirtualAccount.eq(virtual_account))
            .filter(transactions::Column::UserUuid.eq(user_uuid))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Billing not found".to_string()))?;

        let items = transaction
            .find_related(carts::Entity)
            .order_by_asc(carts::Column::Uuid)
            .all(&self.pool)
            .await?;

        Ok(BillingDetail { transaction, items })
    }

    pub async fn list_for_user(&self, user_uuid: Uuid) -> AppResult<Vec<transactions::Model>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::UserUuid.eq(user_uuid))
            .order_by_desc(transactions::Column::Created)
            .all(&self.pool)
            .await?;
        Ok(models)
    }

    /// Move a transaction out of `UNPAID`. Settled transactions never change.
    pub async fn update_status(
        &self,
        uuid: Uuid,
        status: TransactionStatus,
    ) -> AppResult<transactions::Model> {
        self.store_status(uuid, status).await.inspect_err(AppError::log)
    }

    async fn store_status(
        &self,
        uuid: Uuid,
        status: TransactionStatus,
    ) -> AppResult<transactions::Model> {
        let txn = self.pool.begin().await?;

        let transaction = transactions::Entity::find_by_id(uuid)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;
        if !transaction.status.can_transition_to(status) {
            return Err(AppError::ValidationError(format!(
                "Transaction {uuid} cannot move from {} to {status}",
                transaction.status
            )));
        }

        let mut model = transaction.into_active_model();
        model.status = Set(status);
        let updated = model.update(&txn).await?;

        txn.commit().await?;
        log::info!("Transaction {uuid} is now {status}");
        Ok(updated)
    }

    /// Append a payment event and mark the transaction `PAID`. Amounts are not
    /// reconciled: a total below the billed amount is only logged.
    pub async fn record_payment(&self, request: RecordPaymentRequest) -> AppResult<PaymentReceipt> {
        self.append_payment(request).await.inspect_err(AppError::log)
    }

    async fn append_payment(&self, request: RecordPaymentRequest) -> AppResult<PaymentReceipt> {
        self.registry
            .enforce(payments::Column::Amount, request.amount.into())?;
        if request.reference.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Payment reference must not be empty".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;

        let transaction = transactions::Entity::find_by_id(request.transaction_uuid)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;
        if !transaction.status.is_open() {
            return Err(AppError::ValidationError(format!(
                "Transaction {} is already settled ({})",
                transaction.uuid, transaction.status
            )));
        }

        let paid_before: i64 = transaction
            .find_related(payments::Entity)
            .all(&txn)
            .await?
            .iter()
            .map(|p| i64::from(p.amount))
            .sum();

        let payment = payments::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            reference: Set(request.reference),
            amount: Set(request.amount),
            transaction_uuid: Set(transaction.uuid),
            payment_datetime: Set(request.payment_datetime),
        }
        .insert(&txn)
        .await
        .map_err(|e| self.registry.classify(e.into()))?;

        let paid = paid_before + i64::from(payment.amount);
        if paid < i64::from(transaction.amount) {
            log::warn!(
                "Transaction {} underpaid: {paid} of {}",
                transaction.uuid,
                transaction.amount
            );
        }
        let mut model = transaction.into_active_model();
        model.status = Set(TransactionStatus::Paid);
        let transaction = model.update(&txn).await?;

        txn.commit().await?;
        log::info!(
            "Recorded payment {} ({}) for transaction {}",
            payment.uuid,
            payment.reference,
            transaction.uuid
        );
        Ok(PaymentReceipt {
            payment,
            transaction,
        })
    }

    pub async fn list_payments(&self, transaction_uuid: Uuid) -> AppResult<Vec<payments::Model>> {
        let models = payments::Entity::find()
            .filter(payments::Column::TransactionUuid.eq(transaction_uuid))
            .order_by_asc(payments::Column::PaymentDatetime)
            .all(&self.pool)
            .await?;
        Ok(models)
    }
}

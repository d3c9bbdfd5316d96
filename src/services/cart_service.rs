use crate::entities::{
    product_entity as products, transaction_cart_entity as carts, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::schema::SchemaRegistry;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// Cart lines of a user. A line is pending while its `transaction_uuid` is
/// null; committed lines belong to a transaction and are read-only here.
#[derive(Clone)]
pub struct CartService {
    pool: DatabaseConnection,
    registry: Arc<SchemaRegistry>,
}

impl CartService {
    pub fn new(pool: DatabaseConnection, registry: Arc<SchemaRegistry>) -> Self {
        Self { pool, registry }
    }

    async fn pending_line<C: ConnectionTrait>(
        conn: &C,
        user_uuid: Uuid,
        product_uuid: Uuid,
    ) -> AppResult<Option<carts::Model>> {
        let line = carts::Entity::find()
            .filter(carts::Column::UserUuid.eq(user_uuid))
            .filter(carts::Column::ProductUuid.eq(product_uuid))
            .filter(carts::Column::TransactionUuid.is_null())
            .one(conn)
            .await?;
        Ok(line)
    }

    /// Reject quantities the registry forbids or the product cannot cover.
    async fn check_qty<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_uuid: Uuid,
        qty: i32,
    ) -> AppResult<()> {
        self.registry.enforce(carts::Column::Qty, qty.into())?;

        let product = products::Entity::find_by_id(product_uuid)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
        if qty > product.stock {
            return Err(AppError::ValidationError(format!(
                "Requested quantity {qty} exceeds available stock {}",
                product.stock
            )));
        }
        Ok(())
    }

    pub async fn find_pending_line(
        &self,
        user_uuid: Uuid,
        product_uuid: Uuid,
    ) -> AppResult<Option<carts::Model>> {
        Self::pending_line(&self.pool, user_uuid, product_uuid).await
    }

    /// Put a product in the user's cart. Each product appears at most once
    /// among the pending lines.
    pub async fn add_line(
        &self,
        user_uuid: Uuid,
        product_uuid: Uuid,
        qty: i32,
    ) -> AppResult<carts::Model> {
        self.insert_line(user_uuid, product_uuid, qty).await.inspect_err(AppError::log)
    }

    async fn insert_line(
        &self,
        user_uuid: Uuid,
        product_uuid: Uuid,
        qty: i32,
    ) -> AppResult<carts::Model> {
        let txn = self.pool.begin().await?;

        // Row lock on the user serializes concurrent adds to the same cart,
        // so two of them cannot both pass the pending-line check below.
        users::Entity::find_by_id(user_uuid)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.check_qty(&txn, product_uuid, qty).await?;
        if Self::pending_line(&txn, user_uuid, product_uuid)
            .await?
            .is_some()
        {
            return Err(AppError::ValidationError(
                "Product is already in the cart".to_string(),
            ));
        }

        let line = carts::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            product_uuid: Set(product_uuid),
            user_uuid: Set(user_uuid),
            qty: Set(qty),
            transaction_uuid: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| self.registry.classify(e.into()))?;

        txn.commit().await?;
        log::info!("User {user_uuid} added product {product_uuid} x{qty} to cart");
        Ok(line)
    }

    pub async fn update_qty(
        &self,
        user_uuid: Uuid,
        product_uuid: Uuid,
        qty: i32,
    ) -> AppResult<carts::Model> {
        self.store_qty(user_uuid, product_uuid, qty).await.inspect_err(AppError::log)
    }

    async fn store_qty(
        &self,
        user_uuid: Uuid,
        product_uuid: Uuid,
        qty: i32,
    ) -> AppResult<carts::Model> {
        let txn = self.pool.begin().await?;

        self.check_qty(&txn, product_uuid, qty).await?;
        let mut line = Self::pending_line(&txn, user_uuid, product_uuid)
            .await?
            .ok_or_else(|| AppError::NotFound("Product is not in the cart".to_string()))?
            .into_active_model();
        line.qty = Set(qty);
        let line = line.update(&txn).await?;

        txn.commit().await?;
        Ok(line)
    }

    pub async fn remove_line(&self, user_uuid: Uuid, product_uuid: Uuid) -> AppResult<()> {
        self.delete_line(user_uuid, product_uuid).await.inspect_err(AppError::log)
    }

    async fn delete_line(&self, user_uuid: Uuid, product_uuid: Uuid) -> AppResult<()> {
        let line = self
            .find_pending_line(user_uuid, product_uuid)
            .await?
            .ok_or_else(|| AppError::NotFound("Product is not in the cart".to_string()))?;
        line.delete(&self.pool).await?;
        Ok(())
    }

    pub async fn list_pending(&self, user_uuid: Uuid) -> AppResult<Vec<carts::Model>> {
        let lines = carts::Entity::find()
            .filter(carts::Column::UserUuid.eq(user_uuid))
            .filter(carts::Column::TransactionUuid.is_null())
            .order_by_asc(carts::Column::Uuid)
            .all(&self.pool)
            .await?;
        Ok(lines)
    }

    pub async fn list_for_transaction(
        &self,
        transaction_uuid: Uuid,
    ) -> AppResult<Vec<carts::Model>> {
        let lines = carts::Entity::find()
            .filter(carts::Column::TransactionUuid.eq(transaction_uuid))
            .order_by_asc(carts::Column::Uuid)
            .all(&self.pool)
            .await?;
        Ok(lines)
    }
}

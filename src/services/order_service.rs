use crate::entities::{order_entity as orders, order_item_entity as order_items};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::schema::SchemaRegistry;
use crate::utils::time;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// Fulfilled orders. An order and its items are written once, together, and
/// never modified afterwards.
#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
    registry: Arc<SchemaRegistry>,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection, registry: Arc<SchemaRegistry>) -> Self {
        Self { pool, registry }
    }

    pub async fn create_order(&self, request: CreateOrderRequest) -> AppResult<OrderDetail> {
        self.insert_order(request).await.inspect_err(AppError::log)
    }

    async fn insert_order(&self, request: CreateOrderRequest) -> AppResult<OrderDetail> {
        if request.items.is_empty() {
            return Err(AppError::ValidationError(
                "Order must contain at least one item".to_string(),
            ));
        }
        self.registry
            .enforce(orders::Column::Amount, request.amount.into())?;
        for item in &request.items {
            self.registry
                .enforce(order_items::Column::Price, item.price.into())?;
            self.registry
                .enforce(order_items::Column::Qty, item.qty.into())?;
        }

        let txn = self.pool.begin().await?;

        let order = orders::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            user_uuid: Set(request.user_uuid),
            amount: Set(request.amount),
            created: Set(time::now()),
        }
        .insert(&txn)
        .await
        .map_err(|e| self.registry.classify(e.into()))?;

        let models: Vec<order_items::ActiveModel> = request
            .items
            .into_iter()
            .map(|item| item.into_active_model(order.uuid))
            .collect();
        order_items::Entity::insert_many(models)
            .exec_without_returning(&txn)
            .await
            .map_err(|e| self.registry.classify(e.into()))?;

        let items = order
            .find_related(order_items::Entity)
            .order_by_asc(order_items::Column::ProductUuid)
            .all(&txn)
            .await?;

        txn.commit().await?;
        log::info!(
            "Created order {} for user {} with {} items",
            order.uuid,
            order.user_uuid,
            items.len()
        );
        Ok(OrderDetail { order, items })
    }

    /// Orders of a user, newest first.
    pub async fn list_orders(
        &self,
        user_uuid: Uuid,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<orders::Model>> {
        let total = orders::Entity::find()
            .filter(orders::Column::UserUuid.eq(user_uuid))
            .count(&self.pool)
            .await?;

        let models = orders::Entity::find()
            .filter(orders::Column::UserUuid.eq(user_uuid))
            .order_by_desc(orders::Column::Created)
            .order_by_asc(orders::Column::Uuid)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(models, params, total))
    }

    /// An order with its items. Orders of other users are reported as missing.
    pub async fn get_order_detail(
        &self,
        user_uuid: Uuid,
        order_uuid: Uuid,
    ) -> AppResult<OrderDetail> {
        let order = orders::Entity::find_by_id(order_uuid)
            .filter(orders::Column::UserUuid.eq(user_uuid))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        let items = order
            .find_related(order_items::Entity)
            .order_by_asc(order_items::Column::ProductUuid)
            .all(&self.pool)
            .await?;

        Ok(OrderDetail { order, items })
    }
}

use crate::entities::product_entity as products;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::schema::SchemaRegistry;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
    Set,
};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct ProductService {
    pool: DatabaseConnection,
    registry: Arc<SchemaRegistry>,
}

impl ProductService {
    pub fn new(pool: DatabaseConnection, registry: Arc<SchemaRegistry>) -> Self {
        Self { pool, registry }
    }

    pub async fn create(&self, request: CreateProductRequest) -> AppResult<products::Model> {
        self.insert_product(request).await.inspect_err(AppError::log)
    }

    async fn insert_product(&self, request: CreateProductRequest) -> AppResult<products::Model> {
        if request.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Product name must not be empty".to_string(),
            ));
        }
        self.registry
            .enforce(products::Column::Stock, request.stock.into())?;
        self.registry
            .enforce(products::Column::Price, request.price.into())?;

        let product = products::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            description: Set(request.description),
            stock: Set(request.stock),
            price: Set(request.price),
        }
        .insert(&self.pool)
        .await
        .map_err(|e| self.registry.classify(e.into()))?;

        log::info!("Created product {} ({})", product.uuid, product.name);
        Ok(product)
    }

    pub async fn get(&self, uuid: Uuid) -> AppResult<products::Model> {
        products::Entity::find_by_id(uuid)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    pub async fn list(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<ProductSummary>> {
        let total = products::Entity::find().count(&self.pool).await?;

        let models = products::Entity::find()
            .order_by_asc(products::Column::Name)
            .order_by_asc(products::Column::Uuid)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;
        let items: Vec<ProductSummary> = models.into_iter().map(ProductSummary::from).collect();

        Ok(PaginatedResponse::new(items, params, total))
    }
}

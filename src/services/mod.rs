pub mod cart_service;
pub mod order_service;
pub mod product_service;
pub mod transaction_service;
pub mod user_service;

pub use cart_service::*;
pub use order_service::*;
pub use product_service::*;
pub use transaction_service::*;
pub use user_service::*;

use crate::config::CheckoutConfig;
use crate::schema::SchemaRegistry;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Every service wired to the same connection pool and schema registry.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub products: ProductService,
    pub carts: CartService,
    pub transactions: TransactionService,
    pub orders: OrderService,
}

impl Services {
    pub fn new(
        pool: DatabaseConnection,
        registry: Arc<SchemaRegistry>,
        checkout: CheckoutConfig,
    ) -> Self {
        Self {
            users: UserService::new(pool.clone(), registry.clone()),
            products: ProductService::new(pool.clone(), registry.clone()),
            carts: CartService::new(pool.clone(), registry.clone()),
            transactions: TransactionService::new(pool.clone(), registry.clone(), checkout),
            orders: OrderService::new(pool, registry),
        }
    }
}

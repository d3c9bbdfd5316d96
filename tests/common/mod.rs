//! Shared setup for integration tests.
#![allow(dead_code)]

use chrono::Duration;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::Arc;
use uuid::Uuid;

use checkout_store::config::{CheckoutConfig, DatabaseConfig};
use checkout_store::database::{create_pool, run_migrations};
use checkout_store::entities::{
    TransactionStatus, product_entity, transaction_entity, user_entity,
};
use checkout_store::schema::SchemaRegistry;
use checkout_store::services::Services;
use checkout_store::utils::time;

/// Fresh in-memory database with the full schema applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn test_pool() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        connect_timeout_secs: 8,
        sqlx_logging: false,
    };
    let pool = create_pool(&config).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub fn registry() -> Arc<SchemaRegistry> {
    Arc::new(SchemaRegistry::checkout())
}

pub async fn test_services(checkout: CheckoutConfig) -> (DatabaseConnection, Services) {
    let pool = test_pool().await;
    let services = Services::new(pool.clone(), registry(), checkout);
    (pool, services)
}

/// Insert a user row directly, bypassing password hashing.
pub async fn insert_user(pool: &DatabaseConnection, email: &str) -> user_entity::Model {
    user_entity::ActiveModel {
        uuid: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("hash".to_string()),
        name: Set("Test User".to_string()),
        session: Set(None),
    }
    .insert(pool)
    .await
    .unwrap()
}

pub async fn insert_product(
    pool: &DatabaseConnection,
    name: &str,
    stock: i32,
    price: i32,
) -> product_entity::Model {
    product_entity::ActiveModel {
        uuid: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(format!("{name} description")),
        stock: Set(stock),
        price: Set(price),
    }
    .insert(pool)
    .await
    .unwrap()
}

pub fn transaction_model(
    user_uuid: Uuid,
    payment_method: &str,
    virtual_account: &str,
) -> transaction_entity::ActiveModel {
    let created = time::now();
    transaction_entity::ActiveModel {
        uuid: Set(Uuid::new_v4()),
        user_uuid: Set(user_uuid),
        status: Set(TransactionStatus::Unpaid),
        amount: Set(1000),
        created: Set(created),
        expired: Set(created + Duration::hours(24)),
        payment_method: Set(payment_method.to_string()),
        virtual_account: Set(virtual_account.to_string()),
    }
}

//! Storage-level guarantees of the checkout schema.

mod common;

use chrono::{Duration, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use checkout_store::AppError;
use checkout_store::entities::{
    TransactionStatus, order_entity, order_item_entity, product_entity, transaction_cart_entity,
    transaction_entity, transaction_payment_entity, user_entity,
};

use common::{insert_product, insert_user, registry, test_pool, transaction_model};

fn order_item(order_uuid: Uuid, product_uuid: Uuid, qty: i32, price: i32) -> order_item_entity::ActiveModel {
    order_item_entity::ActiveModel {
        order_uuid: Set(order_uuid),
        product_uuid: Set(product_uuid),
        name: Set("Kopi".to_string()),
        description: Set("Roasted beans".to_string()),
        price: Set(price),
        qty: Set(qty),
    }
}

async fn insert_order(pool: &sea_orm::DatabaseConnection, user_uuid: Uuid) -> order_entity::Model {
    order_entity::ActiveModel {
        uuid: Set(Uuid::new_v4()),
        user_uuid: Set(user_uuid),
        amount: Set(2000),
        created: Set(checkout_store::utils::time::now()),
    }
    .insert(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let pool = test_pool().await;
    let registry = registry();

    insert_user(&pool, "a@x.com").await;

    let err = user_entity::ActiveModel {
        uuid: Set(Uuid::new_v4()),
        email: Set("a@x.com".to_string()),
        password_hash: Set("other".to_string()),
        name: Set("Second".to_string()),
        session: Set(None),
    }
    .insert(&pool)
    .await
    .map_err(|e| registry.classify(e.into()))
    .unwrap_err();

    assert!(matches!(err, AppError::DuplicateKey(ref name) if name == "uq_user_email"));
    assert_eq!(err.code(), "DUPLICATE_KEY");
    assert_eq!(user_entity::Entity::find().all(&pool).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_virtual_account_pair_is_unique_per_payment_method() {
    let pool = test_pool().await;
    let registry = registry();
    let user = insert_user(&pool, "va@x.com").await;

    transaction_model(user.uuid, "va", "001")
        .insert(&pool)
        .await
        .unwrap();

    let err = transaction_model(user.uuid, "va", "001")
        .insert(&pool)
        .await
        .map_err(|e| registry.classify(e.into()))
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::DuplicateKey(ref name) if name == "uq_transaction_payment_method_virtual_account"
    ));

    // differing in either field is fine
    transaction_model(user.uuid, "qris", "001")
        .insert(&pool)
        .await
        .unwrap();
    transaction_model(user.uuid, "va", "002")
        .insert(&pool)
        .await
        .unwrap();

    assert_eq!(transaction_entity::Entity::find().all(&pool).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_order_item_composite_key_is_unique() {
    let pool = test_pool().await;
    let registry = registry();
    let user = insert_user(&pool, "order@x.com").await;
    let product = insert_product(&pool, "Kopi", 10, 1000).await;
    let order = insert_order(&pool, user.uuid).await;

    order_item(order.uuid, product.uuid, 2, 1000)
        .insert(&pool)
        .await
        .unwrap();

    let err = order_item(order.uuid, product.uuid, 1, 1000)
        .insert(&pool)
        .await
        .map_err(|e| registry.classify(e.into()))
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateKey(ref name) if name == "pk_order_item"));

    // same product in another order is a different key
    let other = insert_order(&pool, user.uuid).await;
    order_item(other.uuid, product.uuid, 1, 1000)
        .insert(&pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_references_are_enforced() {
    let pool = test_pool().await;

    let err = transaction_model(Uuid::new_v4(), "va", "009")
        .insert(&pool)
        .await
        .map_err(AppError::from)
        .unwrap_err();
    assert!(matches!(err, AppError::ForeignKeyViolation(_)));
}

#[tokio::test]
async fn test_every_entity_round_trips_by_primary_key() {
    let pool = test_pool().await;

    let expected_user = user_entity::Model {
        uuid: Uuid::new_v4(),
        email: "round@trip.com".to_string(),
        password_hash: "$2b$12$hash".to_string(),
        name: "Round Trip".to_string(),
        session: Some("token".to_string()),
    };
    user_entity::ActiveModel {
        uuid: Set(expected_user.uuid),
        email: Set(expected_user.email.clone()),
        password_hash: Set(expected_user.password_hash.clone()),
        name: Set(expected_user.name.clone()),
        session: Set(expected_user.session.clone()),
    }
    .insert(&pool)
    .await
    .unwrap();
    assert_eq!(
        user_entity::Entity::find_by_id(expected_user.uuid).one(&pool).await.unwrap(),
        Some(expected_user.clone())
    );

    let expected_product = product_entity::Model {
        uuid: Uuid::new_v4(),
        name: "Teh".to_string(),
        description: "Jasmine tea".to_string(),
        stock: 5,
        price: 750,
    };
    product_entity::ActiveModel {
        uuid: Set(expected_product.uuid),
        name: Set(expected_product.name.clone()),
        description: Set(expected_product.description.clone()),
        stock: Set(expected_product.stock),
        price: Set(expected_product.price),
    }
    .insert(&pool)
    .await
    .unwrap();
    assert_eq!(
        product_entity::Entity::find_by_id(expected_product.uuid).one(&pool).await.unwrap(),
        Some(expected_product.clone())
    );

    // sub-second precision must survive the trip
    let created = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 15).unwrap()
        + Duration::microseconds(123_456);
    let expected_transaction = transaction_entity::Model {
        uuid: Uuid::new_v4(),
        user_uuid: expected_user.uuid,
        status: TransactionStatus::Paid,
        amount: 1500,
        created,
        expired: created + Duration::hours(24),
        payment_method: "va".to_string(),
        virtual_account: "0034567890123456".to_string(),
    };
    transaction_entity::ActiveModel {
        uuid: Set(expected_transaction.uuid),
        user_uuid: Set(expected_transaction.user_uuid),
        status: Set(expected_transaction.status),
        amount: Set(expected_transaction.amount),
        created: Set(expected_transaction.created),
        expired: Set(expected_transaction.expired),
        payment_method: Set(expected_transaction.payment_method.clone()),
        virtual_account: Set(expected_transaction.virtual_account.clone()),
    }
    .insert(&pool)
    .await
    .unwrap();
    let transaction = transaction_entity::Entity::find_by_id(expected_transaction.uuid)
        .one(&pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(transaction, expected_transaction);
    assert_eq!(transaction.created, created);

    let expected_line = transaction_cart_entity::Model {
        uuid: Uuid::new_v4(),
        product_uuid: expected_product.uuid,
        user_uuid: expected_user.uuid,
        qty: 2,
        transaction_uuid: Some(expected_transaction.uuid),
    };
    transaction_cart_entity::ActiveModel {
        uuid: Set(expected_line.uuid),
        product_uuid: Set(expected_line.product_uuid),
        user_uuid: Set(expected_line.user_uuid),
        qty: Set(expected_line.qty),
        transaction_uuid: Set(expected_line.transaction_uuid),
    }
    .insert(&pool)
    .await
    .unwrap();
    assert_eq!(
        transaction_cart_entity::Entity::find_by_id(expected_line.uuid).one(&pool).await.unwrap(),
        Some(expected_line)
    );

    let expected_payment = transaction_payment_entity::Model {
        uuid: Uuid::new_v4(),
        reference: "GW-0001".to_string(),
        amount: 1500,
        transaction_uuid: expected_transaction.uuid,
        payment_datetime: created + Duration::minutes(5),
    };
    transaction_payment_entity::ActiveModel {
        uuid: Set(expected_payment.uuid),
        reference: Set(expected_payment.reference.clone()),
        amount: Set(expected_payment.amount),
        transaction_uuid: Set(expected_payment.transaction_uuid),
        payment_datetime: Set(expected_payment.payment_datetime),
    }
    .insert(&pool)
    .await
    .unwrap();
    let payment = transaction_payment_entity::Entity::find_by_id(expected_payment.uuid)
        .one(&pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.payment_datetime, created + Duration::minutes(5));
    assert_eq!(payment, expected_payment);

    let expected_order = order_entity::Model {
        uuid: Uuid::new_v4(),
        user_uuid: expected_user.uuid,
        amount: 1500,
        created,
    };
    order_entity::ActiveModel {
        uuid: Set(expected_order.uuid),
        user_uuid: Set(expected_order.user_uuid),
        amount: Set(expected_order.amount),
        created: Set(expected_order.created),
    }
    .insert(&pool)
    .await
    .unwrap();
    assert_eq!(
        order_entity::Entity::find_by_id(expected_order.uuid).one(&pool).await.unwrap(),
        Some(expected_order.clone())
    );

    let expected_item = order_item_entity::Model {
        order_uuid: expected_order.uuid,
        product_uuid: expected_product.uuid,
        name: "Kopi".to_string(),
        description: "Roasted beans".to_string(),
        price: 750,
        qty: 2,
    };
    order_item(expected_order.uuid, expected_product.uuid, 2, 750)
        .insert(&pool)
        .await
        .unwrap();
    assert_eq!(
        order_item_entity::Entity::find_by_id((expected_order.uuid, expected_product.uuid))
            .one(&pool)
            .await
            .unwrap(),
        Some(expected_item)
    );
}

pub mod order_items;
pub mod orders;
pub mod products;
pub mod transaction_carts;
pub mod transaction_payments;
pub mod transactions;
pub mod users;

pub use order_items as order_item_entity;
pub use orders as order_entity;
pub use products as product_entity;
pub use transaction_carts as transaction_cart_entity;
pub use transaction_payments as transaction_payment_entity;
pub use transactions as transaction_entity;
pub use transactions::TransactionStatus;
pub use users as user_entity;

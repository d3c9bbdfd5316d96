use crate::naming;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum User {
    Table,
    Uuid,
    Email,
    Password,
    Name,
    Session,
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Uuid,
    Name,
    Description,
    Stock,
    Price,
}

#[derive(DeriveIden)]
enum Transaction {
    Table,
    Uuid,
    UserUuid,
    Status,
    Amount,
    Created,
    Expired,
    PaymentMethod,
    VirtualAccount,
}

#[derive(DeriveIden)]
enum TransactionCart {
    Table,
    Uuid,
    ProductUuid,
    UserUuid,
    Qty,
    TransactionUuid,
}

#[derive(DeriveIden)]
enum TransactionPayment {
    Table,
    Uuid,
    Reference,
    Amount,
    TransactionUuid,
    PaymentDatetime,
}

#[derive(DeriveIden)]
enum Order {
    Table,
    Uuid,
    UserUuid,
    Amount,
    Created,
}

#[derive(DeriveIden)]
enum OrderItem {
    Table,
    OrderUuid,
    ProductUuid,
    Name,
    Description,
    Price,
    Qty,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let user = User::Table.to_string();
        let product = Product::Table.to_string();
        let transaction = Transaction::Table.to_string();
        let cart = TransactionCart::Table.to_string();
        let payment = TransactionPayment::Table.to_string();
        let order = Order::Table.to_string();
        let order_item = OrderItem::Table.to_string();

        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(User::Uuid).uuid().not_null())
                    .col(ColumnDef::new(User::Email).text().not_null())
                    .col(ColumnDef::new(User::Password).text().not_null())
                    .col(ColumnDef::new(User::Name).text().not_null())
                    .col(ColumnDef::new(User::Session).text().null())
                    .primary_key(Index::create().name(naming::pk(&user)).col(User::Uuid))
                    .index(
                        Index::create()
                            .name(naming::uq(&user, &["email"]))
                            .col(User::Email)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Product::Uuid).uuid().not_null())
                    .col(ColumnDef::new(Product::Name).text().not_null())
                    .col(ColumnDef::new(Product::Description).text().not_null())
                    .col(ColumnDef::new(Product::Stock).integer().not_null())
                    .col(ColumnDef::new(Product::Price).integer().not_null())
                    .primary_key(
                        Index::create()
                            .name(naming::pk(&product))
                            .col(Product::Uuid),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transaction::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Transaction::Uuid).uuid().not_null())
                    .col(ColumnDef::new(Transaction::UserUuid).uuid().not_null())
                    // Free text on purpose: the closed set of states lives in the entity enum.
                    .col(ColumnDef::new(Transaction::Status).text().not_null())
                    .col(ColumnDef::new(Transaction::Amount).integer().not_null())
                    .col(
                        ColumnDef::new(Transaction::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transaction::Expired)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transaction::PaymentMethod).text().not_null())
                    .col(ColumnDef::new(Transaction::VirtualAccount).text().not_null())
                    .primary_key(
                        Index::create()
                            .name(naming::pk(&transaction))
                            .col(Transaction::Uuid),
                    )
                    .index(
                        Index::create()
                            .name(naming::uq(
                                &transaction,
                                &["payment_method", "virtual_account"],
                            ))
                            .col(Transaction::PaymentMethod)
                            .col(Transaction::VirtualAccount)
                            .unique(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(naming::fk(&transaction, "user_uuid", &user))
                            .from(Transaction::Table, Transaction::UserUuid)
                            .to(User::Table, User::Uuid),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TransactionCart::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TransactionCart::Uuid).uuid().not_null())
                    .col(
                        ColumnDef::new(TransactionCart::ProductUuid)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TransactionCart::UserUuid).uuid().not_null())
                    .col(ColumnDef::new(TransactionCart::Qty).integer().not_null())
                    .col(ColumnDef::new(TransactionCart::TransactionUuid).uuid().null())
                    .primary_key(
                        Index::create()
                            .name(naming::pk(&cart))
                            .col(TransactionCart::Uuid),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(naming::fk(&cart, "product_uuid", &product))
                            .from(TransactionCart::Table, TransactionCart::ProductUuid)
                            .to(Product::Table, Product::Uuid),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(naming::fk(&cart, "user_uuid", &user))
                            .from(TransactionCart::Table, TransactionCart::UserUuid)
                            .to(User::Table, User::Uuid),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(naming::fk(&cart, "transaction_uuid", &transaction))
                            .from(TransactionCart::Table, TransactionCart::TransactionUuid)
                            .to(Transaction::Table, Transaction::Uuid),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TransactionPayment::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TransactionPayment::Uuid).uuid().not_null())
                    .col(ColumnDef::new(TransactionPayment::Reference).text().not_null())
                    .col(
                        ColumnDef::new(TransactionPayment::Amount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionPayment::TransactionUuid)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionPayment::PaymentDatetime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name(naming::pk(&payment))
                            .col(TransactionPayment::Uuid),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(naming::fk(&payment, "transaction_uuid", &transaction))
                            .from(
                                TransactionPayment::Table,
                                TransactionPayment::TransactionUuid,
                            )
                            .to(Transaction::Table, Transaction::Uuid),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Order::Uuid).uuid().not_null())
                    .col(ColumnDef::new(Order::UserUuid).uuid().not_null())
                    .col(ColumnDef::new(Order::Amount).integer().not_null())
                    .col(
                        ColumnDef::new(Order::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(Index::create().name(naming::pk(&order)).col(Order::Uuid))
                    .foreign_key(
                        ForeignKey::create()
                            .name(naming::fk(&order, "user_uuid", &user))
                            .from(Order::Table, Order::UserUuid)
                            .to(User::Table, User::Uuid),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderItem::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OrderItem::OrderUuid).uuid().not_null())
                    .col(ColumnDef::new(OrderItem::ProductUuid).uuid().not_null())
                    .col(ColumnDef::new(OrderItem::Name).text().not_null())
                    .col(ColumnDef::new(OrderItem::Description).text().not_null())
                    .col(ColumnDef::new(OrderItem::Price).integer().not_null())
                    .col(ColumnDef::new(OrderItem::Qty).integer().not_null())
                    .primary_key(
                        Index::create()
                            .name(naming::pk(&order_item))
                            .col(OrderItem::OrderUuid)
                            .col(OrderItem::ProductUuid),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(naming::fk(&order_item, "order_uuid", &order))
                            .from(OrderItem::Table, OrderItem::OrderUuid)
                            .to(Order::Table, Order::Uuid),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(naming::fk(&order_item, "product_uuid", &product))
                            .from(OrderItem::Table, OrderItem::ProductUuid)
                            .to(Product::Table, Product::Uuid),
                    )
                    .to_owned(),
            )
            .await?;

        // Secondary indexes
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(naming::ix(&transaction, "user_uuid"))
                    .table(Transaction::Table)
                    .col(Transaction::UserUuid)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(naming::ix(&cart, "product_uuid"))
                    .table(TransactionCart::Table)
                    .col(TransactionCart::ProductUuid)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(naming::ix(&cart, "user_uuid"))
                    .table(TransactionCart::Table)
                    .col(TransactionCart::UserUuid)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(naming::ix(&order, "user_uuid"))
                    .table(Order::Table)
                    .col(Order::UserUuid)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children first so no foreign key is left dangling.
        manager
            .drop_table(Table::drop().table(OrderItem::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Order::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(TransactionPayment::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(TransactionCart::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Transaction::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Product::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

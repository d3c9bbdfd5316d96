use crate::entities::{
    order_item_entity as order_items, order_entity as orders, product_entity as products,
    transaction_cart_entity as carts, transaction_entity as transactions,
    transaction_payment_entity as payments, user_entity as users,
};
use crate::error::{AppError, AppResult};
use migration::NamingConvention;
use sea_orm::{ColumnTrait, EntityName, EntityTrait, IdenStatic};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Primary,
    Unique,
}

/// A primary key or unique constraint together with its generated name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub kind: KeyKind,
}

impl UniqueKey {
    /// Column list the way SQLite reports it: `table.col0, table.col1`.
    fn column_signature(&self) -> String {
        self.columns
            .iter()
            .map(|c| format!("{}.{c}", self.table))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether a unique-violation message from the database refers to this key.
    /// Postgres names the constraint; SQLite lists the qualified columns.
    pub fn matches(&self, message: &str) -> bool {
        if let Some((_, columns)) = message.split_once("UNIQUE constraint failed: ") {
            return columns.trim() == self.column_signature();
        }
        message.contains(&format!("\"{}\"", self.name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub name: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignRef {
    pub name: String,
    pub column: String,
    pub referred_table: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckRule {
    NonNegative,
    Positive,
}

impl CheckRule {
    pub fn holds(&self, value: i64) -> bool {
        match self {
            CheckRule::NonNegative => value >= 0,
            CheckRule::Positive => value > 0,
        }
    }
}

impl fmt::Display for CheckRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckRule::NonNegative => write!(f, "must not be negative"),
            CheckRule::Positive => write!(f, "must be greater than zero"),
        }
    }
}

/// Value rule enforced by the data-access layer before a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckDef {
    pub name: String,
    pub column: String,
    pub rule: CheckRule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    pub name: String,
    pub primary_key: UniqueKey,
    pub unique_keys: Vec<UniqueKey>,
    pub indexes: Vec<IndexDef>,
    pub references: Vec<ForeignRef>,
    pub checks: Vec<CheckDef>,
}

impl TableDef {
    fn new<E: EntityTrait>(naming: NamingConvention, entity: E, primary_key: &[E::Column]) -> Self {
        let name = entity.table_name().to_string();
        let primary_key = UniqueKey {
            name: naming.primary_key(&name),
            table: name.clone(),
            columns: primary_key.iter().map(|c| c.as_str().to_owned()).collect(),
            kind: KeyKind::Primary,
        };
        Self {
            name,
            primary_key,
            unique_keys: Vec::new(),
            indexes: Vec::new(),
            references: Vec::new(),
            checks: Vec::new(),
        }
    }

    fn unique<C: ColumnTrait>(mut self, naming: NamingConvention, columns: &[C]) -> Self {
        let columns: Vec<String> = columns.iter().map(|c| c.as_str().to_owned()).collect();
        let labels: Vec<&str> = columns.iter().map(String::as_str).collect();
        self.unique_keys.push(UniqueKey {
            name: naming.unique(&self.name, &labels),
            table: self.name.clone(),
            columns,
            kind: KeyKind::Unique,
        });
        self
    }

    fn index<C: ColumnTrait>(mut self, naming: NamingConvention, column: C) -> Self {
        self.indexes.push(IndexDef {
            name: naming.index(&self.name, column.as_str()),
            column: column.as_str().to_owned(),
        });
        self
    }

    fn references<C: ColumnTrait, R: EntityTrait>(
        mut self,
        naming: NamingConvention,
        column: C,
        referred: R,
    ) -> Self {
        let referred_table = referred.table_name().to_string();
        self.references.push(ForeignRef {
            name: naming.foreign_key(&self.name, column.as_str(), &referred_table),
            column: column.as_str().to_owned(),
            referred_table,
        });
        self
    }

    fn check<C: ColumnTrait>(mut self, naming: NamingConvention, column: C, rule: CheckRule) -> Self {
        let suffix = match rule {
            CheckRule::NonNegative => "non_negative",
            CheckRule::Positive => "positive",
        };
        self.checks.push(CheckDef {
            name: naming.check(&self.name, &format!("{}_{suffix}", column.as_str())),
            column: column.as_str().to_owned(),
            rule,
        });
        self
    }

    /// Primary key first, then unique keys.
    pub fn keys(&self) -> impl Iterator<Item = &UniqueKey> {
        std::iter::once(&self.primary_key).chain(self.unique_keys.iter())
    }

    pub fn constraint_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.keys().map(|k| k.name.clone()).collect();
        names.extend(self.indexes.iter().map(|i| i.name.clone()));
        names.extend(self.references.iter().map(|r| r.name.clone()));
        names.extend(self.checks.iter().map(|c| c.name.clone()));
        names
    }
}

/// Every table of the checkout schema with its derived constraint names.
///
/// Built once at startup and handed to each service; nothing reads it through
/// global state.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    naming: NamingConvention,
    tables: Vec<TableDef>,
}

impl SchemaRegistry {
    pub fn checkout() -> Self {
        let n = NamingConvention;
        let tables = vec![
            TableDef::new(n, users::Entity, &[users::Column::Uuid])
                .unique(n, &[users::Column::Email]),
            TableDef::new(n, products::Entity, &[products::Column::Uuid])
                .check(n, products::Column::Stock, CheckRule::NonNegative)
                .check(n, products::Column::Price, CheckRule::NonNegative),
            TableDef::new(n, transactions::Entity, &[transactions::Column::Uuid])
                .unique(
                    n,
                    &[
                        transactions::Column::PaymentMethod,
                        transactions::Column::VirtualAccount,
                    ],
                )
                .index(n, transactions::Column::UserUuid)
                .references(n, transactions::Column::UserUuid, users::Entity)
                .check(n, transactions::Column::Amount, CheckRule::NonNegative),
            TableDef::new(n, carts::Entity, &[carts::Column::Uuid])
                .index(n, carts::Column::ProductUuid)
                .index(n, carts::Column::UserUuid)
                .references(n, carts::Column::ProductUuid, products::Entity)
                .references(n, carts::Column::UserUuid, users::Entity)
                .references(n, carts::Column::TransactionUuid, transactions::Entity)
                .check(n, carts::Column::Qty, CheckRule::Positive),
            TableDef::new(n, payments::Entity, &[payments::Column::Uuid])
                .references(n, payments::Column::TransactionUuid, transactions::Entity)
                .check(n, payments::Column::Amount, CheckRule::NonNegative),
            TableDef::new(n, orders::Entity, &[orders::Column::Uuid])
                .index(n, orders::Column::UserUuid)
                .references(n, orders::Column::UserUuid, users::Entity)
                .check(n, orders::Column::Amount, CheckRule::NonNegative),
            TableDef::new(
                n,
                order_items::Entity,
                &[order_items::Column::OrderUuid, order_items::Column::ProductUuid],
            )
            .references(n, order_items::Column::OrderUuid, orders::Entity)
            .references(n, order_items::Column::ProductUuid, products::Entity)
            .check(n, order_items::Column::Price, CheckRule::NonNegative)
            .check(n, order_items::Column::Qty, CheckRule::Positive),
        ];

        Self { naming: n, tables }
    }

    pub fn naming(&self) -> NamingConvention {
        self.naming
    }

    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn constraint_names(&self) -> Vec<String> {
        self.tables.iter().flat_map(|t| t.constraint_names()).collect()
    }

    /// Find the key a raw unique-violation message refers to.
    pub fn resolve_unique_violation(&self, message: &str) -> Option<&UniqueKey> {
        self.tables
            .iter()
            .flat_map(|t| t.keys())
            .find(|k| k.matches(message))
    }

    /// Replace the raw database message of a duplicate-key error with the
    /// name of the violated constraint. Other errors pass through untouched.
    pub fn classify(&self, err: AppError) -> AppError {
        match err {
            AppError::DuplicateKey(message) => match self.resolve_unique_violation(&message) {
                Some(key) => AppError::DuplicateKey(key.name.clone()),
                None => AppError::DuplicateKey(message),
            },
            other => other,
        }
    }

    /// Apply the value rule registered for `column`, if any.
    pub fn enforce<C: ColumnTrait>(&self, column: C, value: i64) -> AppResult<()> {
        let table = C::EntityName::default().table_name().to_string();
        let check = self
            .table(&table)
            .and_then(|t| t.checks.iter().find(|c| c.column == column.as_str()));

        match check {
            Some(check) if !check.rule.holds(value) => Err(AppError::ValidationError(format!(
                "{}: {} {} (got {value})",
                check.name,
                column.as_str(),
                check.rule
            ))),
            _ => Ok(()),
        }
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::checkout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_all_tables() {
        let registry = SchemaRegistry::checkout();
        let names: Vec<&str> = registry.tables().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "user",
                "product",
                "transaction",
                "transaction_cart",
                "transaction_payment",
                "order",
                "order_item"
            ]
        );
    }

    #[test]
    fn test_constraint_names_follow_convention() {
        let registry = SchemaRegistry::checkout();
        let names = registry.constraint_names();
        for expected in [
            "pk_user",
            "uq_user_email",
            "uq_transaction_payment_method_virtual_account",
            "ix_transaction_user_uuid",
            "ix_transaction_cart_product_uuid",
            "ix_transaction_cart_user_uuid",
            "ix_order_user_uuid",
            "fk_transaction_user_uuid_user",
            "fk_transaction_cart_transaction_uuid_transaction",
            "fk_order_item_order_uuid_order",
            "pk_order_item",
            "ck_product_stock_non_negative",
            "ck_order_item_qty_positive",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_order_item_has_composite_primary_key() {
        let registry = SchemaRegistry::checkout();
        let table = registry.table("order_item").unwrap();
        assert_eq!(table.primary_key.columns, vec!["order_uuid", "product_uuid"]);
        assert_eq!(table.primary_key.kind, KeyKind::Primary);
    }

    #[test]
    fn test_column_labels_are_recorded() {
        let registry = SchemaRegistry::checkout();
        let table = registry.table("transaction_cart").unwrap();

        let indexed: Vec<&str> = table.indexes.iter().map(|i| i.column.as_str()).collect();
        assert_eq!(indexed, vec!["product_uuid", "user_uuid"]);
        assert_eq!(table.references[2].column, "transaction_uuid");
        assert_eq!(table.references[2].referred_table, "transaction");
        assert_eq!(table.checks[0].column, "qty");

        let transaction = registry.table("transaction").unwrap();
        assert_eq!(
            transaction.unique_keys[0].columns,
            vec!["payment_method", "virtual_account"]
        );
    }

    #[test]
    fn test_resolve_sqlite_messages() {
        let registry = SchemaRegistry::checkout();

        let key = registry
            .resolve_unique_violation("UNIQUE constraint failed: user.email")
            .unwrap();
        assert_eq!(key.name, "uq_user_email");

        let key = registry
            .resolve_unique_violation(
                "UNIQUE constraint failed: transaction.payment_method, transaction.virtual_account",
            )
            .unwrap();
        assert_eq!(key.name, "uq_transaction_payment_method_virtual_account");

        let key = registry
            .resolve_unique_violation(
                "UNIQUE constraint failed: order_item.order_uuid, order_item.product_uuid",
            )
            .unwrap();
        assert_eq!(key.name, "pk_order_item");

        let key = registry
            .resolve_unique_violation("UNIQUE constraint failed: transaction_cart.uuid")
            .unwrap();
        assert_eq!(key.name, "pk_transaction_cart");
    }

    #[test]
    fn test_resolve_postgres_messages() {
        let registry = SchemaRegistry::checkout();
        let key = registry
            .resolve_unique_violation(
                "duplicate key value violates unique constraint \"uq_user_email\"",
            )
            .unwrap();
        assert_eq!(key.name, "uq_user_email");
        assert!(registry
            .resolve_unique_violation("duplicate key value violates unique constraint \"nope\"")
            .is_none());
    }

    #[test]
    fn test_classify_rewrites_only_duplicates() {
        let registry = SchemaRegistry::checkout();
        let err = registry.classify(AppError::DuplicateKey(
            "UNIQUE constraint failed: user.email".to_string(),
        ));
        assert!(matches!(err, AppError::DuplicateKey(ref name) if name == "uq_user_email"));

        let err = registry.classify(AppError::NotFound("user".to_string()));
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_enforce_checks() {
        let registry = SchemaRegistry::checkout();
        assert!(registry.enforce(products::Column::Stock, 0).is_ok());
        assert!(registry.enforce(products::Column::Price, 1000).is_ok());
        assert!(registry.enforce(carts::Column::Qty, 1).is_ok());

        let err = registry.enforce(products::Column::Stock, -1).unwrap_err();
        assert!(err.to_string().contains("ck_product_stock_non_negative"));
        assert!(registry.enforce(carts::Column::Qty, 0).is_err());

        // no rule registered for this column
        assert!(registry.enforce(products::Column::Name, -5).is_ok());
    }
}

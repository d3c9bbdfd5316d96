pub use sea_orm_migration::prelude::*;

pub mod naming;

mod m20240601_000001_create_checkout_tables;

pub use naming::NamingConvention;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240601_000001_create_checkout_tables::Migration)]
    }
}

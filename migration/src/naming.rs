//! Constraint naming convention.
//!
//! Every named constraint in the schema is derived from table and column names,
//! so the generated DDL is identical on every environment it runs against.

/// `ix_<table>_<column>`. The column label of an index is the column name
/// qualified by its table.
pub fn ix(table: &str, column: &str) -> String {
    format!("ix_{table}_{column}")
}

/// `uq_<table>_<col0>_<col1>...`
pub fn uq(table: &str, columns: &[&str]) -> String {
    format!("uq_{table}_{}", columns.join("_"))
}

/// `ck_<table>_<constraint>`
pub fn ck(table: &str, constraint: &str) -> String {
    format!("ck_{table}_{constraint}")
}

/// `fk_<table>_<column>_<referred_table>`
pub fn fk(table: &str, column: &str, referred_table: &str) -> String {
    format!("fk_{table}_{column}_{referred_table}")
}

/// `pk_<table>`
pub fn pk(table: &str) -> String {
    format!("pk_{table}")
}

/// The convention as a value, for code that takes the naming scheme as a
/// collaborator instead of calling the free functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamingConvention;

impl NamingConvention {
    pub fn index(&self, table: &str, column: &str) -> String {
        ix(table, column)
    }

    pub fn unique(&self, table: &str, columns: &[&str]) -> String {
        uq(table, columns)
    }

    pub fn check(&self, table: &str, constraint: &str) -> String {
        ck(table, constraint)
    }

    pub fn foreign_key(&self, table: &str, column: &str, referred_table: &str) -> String {
        fk(table, column, referred_table)
    }

    pub fn primary_key(&self, table: &str) -> String {
        pk(table)
    }
}

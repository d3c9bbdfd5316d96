//! Schema metadata shared with the data-access layer.

pub mod registry;

pub use migration::naming;
pub use migration::NamingConvention;
pub use registry::{
    CheckDef, CheckRule, ForeignRef, IndexDef, KeyKind, SchemaRegistry, TableDef, UniqueKey,
};

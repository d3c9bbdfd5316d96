pub mod order;
pub mod pagination;
pub mod product;
pub mod transaction;
pub mod user;

pub use order::*;
pub use pagination::*;
pub use product::*;
pub use transaction::*;
pub use user::*;

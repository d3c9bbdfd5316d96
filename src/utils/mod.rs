pub mod code_generator;
pub mod email;
pub mod password;
pub mod time;

pub use code_generator::{generate_session_token, generate_virtual_account};
pub use email::*;
pub use password::*;

use crate::entities::user_entity;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// User as exposed to callers; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub uuid: Uuid,
    pub email: String,
    pub name: String,
    pub session: Option<String>,
}

impl From<user_entity::Model> for UserResponse {
    fn from(m: user_entity::Model) -> Self {
        Self {
            uuid: m.uuid,
            email: m.email,
            name: m.name,
            session: m.session,
        }
    }
}

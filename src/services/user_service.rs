use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::schema::SchemaRegistry;
use crate::utils::{
    generate_session_token, hash_password, normalize_email, validate_email, validate_password,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use std::sync::Arc;
use uuid::Uuid;

const SESSION_TOKEN_LENGTH: usize = 64;

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
    registry: Arc<SchemaRegistry>,
}

impl UserService {
    pub fn new(pool: DatabaseConnection, registry: Arc<SchemaRegistry>) -> Self {
        Self { pool, registry }
    }

    /// Register a new user. A second registration with the same email fails
    /// with `DuplicateKey("uq_user_email")`.
    pub async fn register(&self, request: RegisterUserRequest) -> AppResult<UserResponse> {
        self.insert_user(request).await.inspect_err(AppError::log)
    }

    async fn insert_user(&self, request: RegisterUserRequest) -> AppResult<UserResponse> {
        let email = normalize_email(&request.email);
        validate_email(&email)?;
        validate_password(&request.password)?;

        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError("Name must not be empty".to_string()));
        }

        let user = users::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(hash_password(&request.password)?),
            name: Set(name.to_string()),
            session: Set(None),
        }
        .insert(&self.pool)
        .await
        .map_err(|e| self.registry.classify(e.into()))?;

        log::info!("Registered user {}", user.uuid);
        Ok(UserResponse::from(user))
    }

    pub async fn get_by_uuid(&self, uuid: Uuid) -> AppResult<users::Model> {
        users::Entity::find_by_id(uuid)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn get_by_email(&self, email: &str) -> AppResult<users::Model> {
        users::Entity::find()
            .filter(users::Column::Email.eq(normalize_email(email)))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Store or clear (`None`) the session token of a user.
    pub async fn set_session(&self, uuid: Uuid, session: Option<String>) -> AppResult<()> {
        self.store_session(uuid, session).await.inspect_err(AppError::log)
    }

    async fn store_session(&self, uuid: Uuid, session: Option<String>) -> AppResult<()> {
        let mut model = self.get_by_uuid(uuid).await?.into_active_model();
        model.session = Set(session);
        model.update(&self.pool).await?;
        Ok(())
    }

    /// Generate a fresh session token for the user and store it.
    pub async fn issue_session(&self, uuid: Uuid) -> AppResult<String> {
        let token = generate_session_token(SESSION_TOKEN_LENGTH);
        self.set_session(uuid, Some(token.clone())).await?;
        log::info!("Issued session for user {uuid}");
        Ok(token)
    }

    /// Look a user up by session token. Accepts a raw `Authorization` value.
    pub async fn get_by_session(&self, authorization: &str) -> AppResult<UserResponse> {
        let token = authorization
            .strip_prefix("Bearer ")
            .unwrap_or(authorization)
            .trim();
        if token.is_empty() {
            return Err(AppError::NotFound("Session not found".to_string()));
        }

        let user = users::Entity::find()
            .filter(users::Column::Session.eq(token))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

        Ok(UserResponse::from(user))
    }
}

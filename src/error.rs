use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(DbErr),

    /// A unique or primary-key constraint rejected the write. Carries the
    /// constraint name once the schema registry has resolved it, otherwise the
    /// raw database message.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => AppError::DuplicateKey(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => AppError::ForeignKeyViolation(msg),
            _ => AppError::DatabaseError(err),
        }
    }
}

impl AppError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::DuplicateKey(_) => "DUPLICATE_KEY",
            AppError::ForeignKeyViolation(_) => "FOREIGN_KEY_VIOLATION",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ConfigError(_) => "CONFIG_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Log the error at the level its kind deserves: caller mistakes at warn,
    /// storage and internal failures at error.
    pub fn log(&self) {
        match self {
            AppError::ValidationError(msg) => log::warn!("Validation error: {msg}"),
            AppError::DuplicateKey(msg) => log::warn!("Duplicate key: {msg}"),
            AppError::ForeignKeyViolation(msg) => log::warn!("Foreign key violation: {msg}"),
            AppError::NotFound(msg) => log::info!("Not found: {msg}"),
            AppError::DatabaseError(err) => log::error!("Database error: {err}"),
            _ => log::error!("Internal error: {self}"),
        }
    }
}

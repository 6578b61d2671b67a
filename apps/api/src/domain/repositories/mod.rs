// Repository interfaces (ports) for the storage adapter
// Infrastructure provides the implementations

pub mod ad_repository;
pub mod category_repository;
pub mod user_repository;

pub use ad_repository::AdRepository;
pub use category_repository::CategoryRepository;
pub use user_repository::UserRepository;

use thiserror::Error;

/// Errors returned by repository implementations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Referenced record does not exist: {0}")]
    MissingReference(String),

    #[error("Invalid data in storage: {0}")]
    InvalidData(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

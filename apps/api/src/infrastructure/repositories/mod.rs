// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod postgres_ad_repository;
pub mod postgres_category_repository;
pub mod postgres_user_repository;

pub use postgres_ad_repository::PostgresAdRepository;
pub use postgres_category_repository::PostgresCategoryRepository;
pub use postgres_user_repository::PostgresUserRepository;

use crate::domain::repositories::RepositoryError;

/// Maps a failed write, turning foreign key violations into `MissingReference`
pub(crate) fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return RepositoryError::MissingReference(db_err.message().to_string());
        }
    }
    RepositoryError::Database(err)
}

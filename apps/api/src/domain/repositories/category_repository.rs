use async_trait::async_trait;

use super::RepositoryResult;
use crate::domain::category::{Category, NewCategory};

/// Repository trait for categories
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// List all categories ordered by name
    async fn list(&self) -> RepositoryResult<Vec<Category>>;

    /// Find a category by its ID
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Category>>;

    /// Create a new category
    async fn create(&self, category: NewCategory) -> RepositoryResult<Category>;

    /// Overwrite the name of an existing category
    ///
    /// Fails with `NotFound` if no category has this ID.
    async fn update(&self, id: i64, category: NewCategory) -> RepositoryResult<Category>;

    /// Delete a category (and, through the schema, its ads)
    async fn delete(&self, id: i64) -> RepositoryResult<()>;
}

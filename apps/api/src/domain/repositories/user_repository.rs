use async_trait::async_trait;

use super::RepositoryResult;
use crate::domain::user::{NewUser, User, UserSummary, UserWithLocations};

/// Repository trait for users and their locations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List all users ordered by username, each with their ad count
    async fn list(&self) -> RepositoryResult<Vec<UserSummary>>;

    /// Find a user by ID
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;

    /// Create a user and associate the given locations
    ///
    /// Each location name is resolved with get-or-create. The user row and
    /// the associations are written atomically.
    async fn create(&self, user: NewUser) -> RepositoryResult<UserWithLocations>;

    /// Overwrite an existing user and replace their location set
    async fn update(&self, id: i64, user: NewUser) -> RepositoryResult<UserWithLocations>;

    /// Delete a user (and, through the schema, their ads)
    async fn delete(&self, id: i64) -> RepositoryResult<()>;
}

use async_trait::async_trait;

use super::RepositoryResult;
use crate::domain::ad::{Ad, NewAd};

/// Repository trait for ads
///
/// Every read returns the joined projection carrying the author's username
/// and the category name.
#[async_trait]
pub trait AdRepository: Send + Sync {
    /// Total number of ads
    async fn count(&self) -> RepositoryResult<i64>;

    /// One page of ads ordered by price descending
    ///
    /// Ties are broken by ascending ID so pages never overlap.
    async fn list_page(&self, offset: i64, limit: i64) -> RepositoryResult<Vec<Ad>>;

    /// Find an ad by its ID
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Ad>>;

    /// Create a new ad without an image
    async fn create(&self, ad: NewAd) -> RepositoryResult<Ad>;

    /// Overwrite every field of an existing ad except its image
    async fn update(&self, id: i64, ad: NewAd) -> RepositoryResult<Ad>;

    /// Set the stored image path of an existing ad
    async fn set_image(&self, id: i64, image: &str) -> RepositoryResult<Ad>;

    /// Delete an ad by ID
    async fn delete(&self, id: i64) -> RepositoryResult<()>;
}

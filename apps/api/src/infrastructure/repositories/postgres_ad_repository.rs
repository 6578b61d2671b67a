use async_trait::async_trait;
use sqlx::PgPool;

use super::map_write_error;
use crate::domain::ad::{Ad, NewAd};
use crate::domain::repositories::{AdRepository, RepositoryError, RepositoryResult};

/// Projection joining an ad row (aliased `a`) with its author and category
const AD_PROJECTION: &str = r#"
    SELECT
        a.id, a.name,
        a.author_id, u.username AS author_username,
        a.price, a.description, a.is_published, a.image,
        a.category_id, c.name AS category_name
    FROM {source} a
    JOIN users u ON u.id = a.author_id
    JOIN categories c ON c.id = a.category_id
"#;

fn projection(source: &str) -> String {
    AD_PROJECTION.replace("{source}", source)
}

/// PostgreSQL implementation of AdRepository
///
/// Writes are single statements: the mutated row is fed through a CTE into
/// the joined projection so the caller gets the stored state back in one
/// round trip.
pub struct PostgresAdRepository {
    pool: PgPool,
}

impl PostgresAdRepository {
    /// Creates a new PostgresAdRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdRepository for PostgresAdRepository {
    async fn count(&self) -> RepositoryResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ads")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn list_page(&self, offset: i64, limit: i64) -> RepositoryResult<Vec<Ad>> {
        let sql = format!(
            "{} ORDER BY a.price DESC, a.id ASC LIMIT $1 OFFSET $2",
            projection("ads")
        );

        let ads = sqlx::query_as::<_, Ad>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(ads)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Ad>> {
        let sql = format!("{} WHERE a.id = $1", projection("ads"));

        let ad = sqlx::query_as::<_, Ad>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(ad)
    }

    async fn create(&self, ad: NewAd) -> RepositoryResult<Ad> {
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO ads (name, author_id, category_id, price, description, is_published)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            {}
            "#,
            projection("inserted")
        );

        let created = sqlx::query_as::<_, Ad>(&sql)
            .bind(ad.name())
            .bind(ad.author_id())
            .bind(ad.category_id())
            .bind(ad.price())
            .bind(ad.description())
            .bind(ad.is_published())
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(created)
    }

    async fn update(&self, id: i64, ad: NewAd) -> RepositoryResult<Ad> {
        let sql = format!(
            r#"
            WITH updated AS (
                UPDATE ads
                SET name = $2,
                    author_id = $3,
                    category_id = $4,
                    price = $5,
                    description = $6,
                    is_published = $7
                WHERE id = $1
                RETURNING *
            )
            {}
            "#,
            projection("updated")
        );

        sqlx::query_as::<_, Ad>(&sql)
            .bind(id)
            .bind(ad.name())
            .bind(ad.author_id())
            .bind(ad.category_id())
            .bind(ad.price())
            .bind(ad.description())
            .bind(ad.is_published())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| RepositoryError::not_found("Ad", id))
    }

    async fn set_image(&self, id: i64, image: &str) -> RepositoryResult<Ad> {
        let sql = format!(
            r#"
            WITH updated AS (
                UPDATE ads SET image = $2 WHERE id = $1 RETURNING *
            )
            {}
            "#,
            projection("updated")
        );

        sqlx::query_as::<_, Ad>(&sql)
            .bind(id)
            .bind(image)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Ad", id))
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM ads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Ad", id));
        }

        Ok(())
    }
}

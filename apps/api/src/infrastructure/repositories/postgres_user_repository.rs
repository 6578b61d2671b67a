use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use crate::domain::repositories::{RepositoryError, RepositoryResult, UserRepository};
use crate::domain::user::{Location, NewUser, User, UserRole, UserSummary, UserWithLocations};

const USER_COLUMNS: &str = "id, username, first_name, last_name, password, role, age";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    first_name: String,
    last_name: String,
    password: String,
    role: String,
    age: i32,
}

#[derive(sqlx::FromRow)]
struct UserSummaryRow {
    #[sqlx(flatten)]
    user: UserRow,
    total_ads: i64,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<UserRole>()
            .map_err(|e| RepositoryError::InvalidData(format!("user {}: {}", row.id, e)))?;

        Ok(User {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            password: row.password,
            role,
            age: row.age,
        })
    }
}

/// PostgreSQL implementation of UserRepository
///
/// Creates and updates run in a single transaction covering the user row,
/// the location lookups and the join table.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Looks a location up by name, creating it if absent
///
/// A concurrent insert of the same name makes `ON CONFLICT DO NOTHING`
/// return no row; the follow-up lookup then sees the committed row.
async fn get_or_create_location(conn: &mut PgConnection, name: &str) -> sqlx::Result<Location> {
    let inserted = sqlx::query_as::<_, Location>(
        r#"
        INSERT INTO locations (name)
        VALUES ($1)
        ON CONFLICT (name) DO NOTHING
        RETURNING id, name
        "#,
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(location) = inserted {
        return Ok(location);
    }

    sqlx::query_as::<_, Location>("SELECT id, name FROM locations WHERE name = $1")
        .bind(name)
        .fetch_one(&mut *conn)
        .await
}

/// Associates a user with a location; repeated associations are ignored
async fn associate(conn: &mut PgConnection, user_id: i64, location_id: i64) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_locations (user_id, location_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(location_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Replaces the full location set of a user with the given names
async fn replace_locations(
    conn: &mut PgConnection,
    user_id: i64,
    names: &[String],
) -> sqlx::Result<Vec<String>> {
    sqlx::query("DELETE FROM user_locations WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    let mut locations = Vec::with_capacity(names.len());
    for name in names {
        let location = get_or_create_location(&mut *conn, name).await?;
        associate(&mut *conn, user_id, location.id).await?;
        locations.push(location.name);
    }

    Ok(locations)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn list(&self) -> RepositoryResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, UserSummaryRow>(
            r#"
            SELECT
                u.id, u.username, u.first_name, u.last_name,
                u.password, u.role, u.age,
                COUNT(a.id) AS total_ads
            FROM users u
            LEFT JOIN ads a ON a.author_id = u.id
            GROUP BY u.id
            ORDER BY u.username, u.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> RepositoryResult<UserSummary> {
                Ok(UserSummary {
                    user: User::try_from(row.user)?,
                    total_ads: row.total_ads,
                })
            })
            .collect()
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn create(&self, user: NewUser) -> RepositoryResult<UserWithLocations> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO users (username, first_name, last_name, password, role, age)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.username())
            .bind(user.first_name())
            .bind(user.last_name())
            .bind(user.password())
            .bind(user.role().as_str())
            .bind(user.age())
            .fetch_one(&mut *tx)
            .await?;

        let locations = replace_locations(&mut *tx, row.id, user.locations()).await?;
        tx.commit().await?;

        Ok(UserWithLocations {
            user: User::try_from(row)?,
            locations,
        })
    }

    async fn update(&self, id: i64, user: NewUser) -> RepositoryResult<UserWithLocations> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            UPDATE users
            SET username = $2,
                first_name = $3,
                last_name = $4,
                password = $5,
                role = $6,
                age = $7
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(user.username())
            .bind(user.first_name())
            .bind(user.last_name())
            .bind(user.password())
            .bind(user.role().as_str())
            .bind(user.age())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| RepositoryError::not_found("User", id))?;

        let locations = replace_locations(&mut *tx, row.id, user.locations()).await?;
        tx.commit().await?;

        Ok(UserWithLocations {
            user: User::try_from(row)?,
            locations,
        })
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("User", id));
        }

        Ok(())
    }
}

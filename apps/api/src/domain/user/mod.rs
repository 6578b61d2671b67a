// User domain module
// Contains the user entity, its location association and value objects

pub mod value_objects;

pub use value_objects::UserRole;

/// Marketplace user
///
/// The password is kept exactly as it was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: UserRole,
    pub age: i32,
}

/// User together with the number of ads they authored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub user: User,
    pub total_ads: i64,
}

/// User together with the names of their associated locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithLocations {
    pub user: User,
    pub locations: Vec<String>,
}

/// A named place, deduplicated by name
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Location {
    pub id: i64,
    pub name: String,
}

/// Validated write model for creating or overwriting a user
///
/// # Invariants
/// - Username is not blank
/// - Age is not negative
/// - Location names are not blank and appear at most once, in the order
///   they were first given
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    username: String,
    first_name: String,
    last_name: String,
    password: String,
    role: UserRole,
    age: i32,
    locations: Vec<String>,
}

impl NewUser {
    /// Creates a new user write model
    ///
    /// Repeated location names collapse into the first occurrence, so a user
    /// is never associated with the same location twice.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        username: String,
        first_name: String,
        last_name: String,
        password: String,
        role: UserRole,
        age: i32,
        locations: Vec<String>,
    ) -> Result<Self, String> {
        if username.trim().is_empty() {
            return Err("Username cannot be empty".to_string());
        }

        if age < 0 {
            return Err("Age cannot be negative".to_string());
        }

        let mut unique: Vec<String> = Vec::with_capacity(locations.len());
        for location in locations {
            if location.trim().is_empty() {
                return Err("Location name cannot be empty".to_string());
            }
            if !unique.contains(&location) {
                unique.push(location);
            }
        }

        Ok(Self {
            username,
            first_name,
            last_name,
            password,
            role,
            age,
            locations: unique,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }
}

use serde::Serialize;

/// A named grouping for ads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Validated write model for creating or renaming a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    name: String,
}

impl NewCategory {
    /// Creates a new category write model
    ///
    /// # Business Rules Enforced
    /// - Name must not be blank
    pub fn new(name: String) -> Result<Self, String> {
        if name.trim().is_empty() {
            return Err("Category name cannot be empty".to_string());
        }

        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

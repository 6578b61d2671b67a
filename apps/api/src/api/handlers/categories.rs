use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use super::health::StatusResponse;
use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathParam};
use crate::api::AppState;
use crate::domain::category::{Category, NewCategory};

/// Request body for creating or renaming a category
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

/// List all categories ordered by name
///
/// GET /categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = state.categories.list().await?;

    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

/// Get a category by ID
///
/// GET /categories/:id
pub async fn get_category(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Category not found: {}", id)))?;

    Ok(Json(CategoryResponse::from(category)))
}

/// Create a new category
///
/// POST /categories
pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let category = NewCategory::new(req.name).map_err(ApiError::bad_request)?;
    let created = state.categories.create(category).await?;

    tracing::info!(category_id = created.id, "Category created");

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(created))))
}

/// Rename a category
///
/// PATCH /categories/:id
pub async fn update_category(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(req): JsonBody<CategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let category = NewCategory::new(req.name).map_err(ApiError::bad_request)?;
    let updated = state.categories.update(id, category).await?;

    tracing::info!(category_id = id, "Category updated");

    Ok(Json(CategoryResponse::from(updated)))
}

/// Delete a category
///
/// DELETE /categories/:id
pub async fn delete_category(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.categories.delete(id).await?;

    tracing::info!(category_id = id, "Category deleted");

    Ok(Json(StatusResponse::ok()))
}

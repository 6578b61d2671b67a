use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use super::health::StatusResponse;
use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathParam};
use crate::api::AppState;
use crate::domain::user::{NewUser, User, UserRole, UserSummary, UserWithLocations};

/// Request body for creating or overwriting a user
#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: UserRole,
    pub age: i32,
    pub locations: Vec<String>,
}

impl TryFrom<UserRequest> for NewUser {
    type Error = String;

    fn try_from(req: UserRequest) -> Result<Self, Self::Error> {
        NewUser::new(
            req.username,
            req.first_name,
            req.last_name,
            req.password,
            req.role,
            req.age,
            req.locations,
        )
    }
}

/// User projection
///
/// `total_ads` is only present in the listing, `locations` only in answers
/// to create and update.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
    pub role: UserRole,
    pub age: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_ads: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
            password: user.password,
            role: user.role,
            age: user.age,
            total_ads: None,
            locations: None,
        }
    }
}

impl From<UserSummary> for UserResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            total_ads: Some(summary.total_ads),
            ..Self::from(summary.user)
        }
    }
}

impl From<UserWithLocations> for UserResponse {
    fn from(user: UserWithLocations) -> Self {
        Self {
            locations: Some(user.locations),
            ..Self::from(user.user)
        }
    }
}

/// List all users ordered by username, with their ad counts
///
/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.list().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get a user by ID
///
/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User not found: {}", id)))?;

    Ok(Json(UserResponse::from(user)))
}

/// Create a user and associate their locations
///
/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = NewUser::try_from(req).map_err(ApiError::bad_request)?;
    let created = state.users.create(user).await?;

    tracing::info!(
        user_id = created.user.id,
        locations = created.locations.len(),
        "User created"
    );

    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

/// Overwrite a user and replace their location set
///
/// PATCH /users/:id
pub async fn update_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(req): JsonBody<UserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = NewUser::try_from(req).map_err(ApiError::bad_request)?;
    let updated = state.users.update(id, user).await?;

    tracing::info!(user_id = id, "User updated");

    Ok(Json(UserResponse::from(updated)))
}

/// Delete a user
///
/// DELETE /users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.users.delete(id).await?;

    tracing::info!(user_id = id, "User deleted");

    Ok(Json(StatusResponse::ok()))
}

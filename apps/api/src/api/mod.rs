// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod extract;
pub mod handlers;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::domain::pagination::Paginator;
use crate::domain::repositories::{AdRepository, CategoryRepository, UserRepository};
use crate::infrastructure::media::MediaStorage;
use crate::infrastructure::repositories::{
    PostgresAdRepository, PostgresCategoryRepository, PostgresUserRepository,
};
use handlers::{ads, categories, health, users};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub ads: Arc<dyn AdRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub users: Arc<dyn UserRepository>,
    pub media: MediaStorage,
    /// Pagination of the ad listing
    pub paginator: Paginator,
}

impl AppState {
    /// Builds state backed by PostgreSQL repositories sharing one pool
    pub fn postgres(pool: PgPool, media: MediaStorage, paginator: Paginator) -> Self {
        Self {
            ads: Arc::new(PostgresAdRepository::new(pool.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(pool.clone())),
            users: Arc::new(PostgresUserRepository::new(pool)),
            media,
            paginator,
        }
    }
}

/// Builds the application router
///
/// `max_upload_bytes` bounds request bodies, image uploads included.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let media = ServeDir::new(state.media.root());

    Router::new()
        // Health check
        .route("/", get(health::root))
        // Ad routes
        .route("/ads", get(ads::list_ads).post(ads::create_ad))
        .route(
            "/ads/:id",
            get(ads::get_ad).patch(ads::update_ad).delete(ads::delete_ad),
        )
        .route("/ads/:id/image", post(ads::upload_ad_image))
        // Category routes
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/:id",
            get(categories::get_category)
                .patch(categories::update_category)
                .delete(categories::delete_category),
        )
        // User routes
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        // Uploaded images
        .nest_service("/media", media)
        // Middleware
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}

use axum::Json;
use serde::Serialize;

/// Acknowledgment body returned by the root endpoint and by deletes
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Health check endpoint
///
/// GET /
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

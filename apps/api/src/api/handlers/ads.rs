use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::health::StatusResponse;
use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathParam, QueryParam};
use crate::api::AppState;
use crate::domain::ad::{Ad, NewAd};
use crate::infrastructure::media::MediaStorage;

/// Reported in place of an image URL by create and update when none is set
pub const NO_IMAGE: &str = "No image";

/// Name of the multipart field carrying the uploaded image
const IMAGE_FIELD: &str = "image";

/// Query parameter selecting the listing page
const PAGE_PARAM: &str = "page";

/// Request body for creating or overwriting an ad
#[derive(Debug, Deserialize)]
pub struct AdRequest {
    pub author: i64,
    pub category: i64,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub is_published: bool,
}

/// Ad projection with the author's username and the category name
#[derive(Debug, Serialize)]
pub struct AdResponse {
    pub id: i64,
    pub name: String,
    pub author: String,
    pub price: Decimal,
    pub description: String,
    pub is_published: bool,
    pub image: Option<String>,
    pub category: String,
}

impl AdResponse {
    fn new(ad: Ad, media: &MediaStorage) -> Self {
        Self {
            id: ad.id,
            name: ad.name,
            author: ad.author_username,
            price: ad.price,
            description: ad.description,
            is_published: ad.is_published,
            image: ad.image.as_deref().map(|path| media.url(path)),
            category: ad.category_name,
        }
    }

    fn with_image_placeholder(mut self) -> Self {
        if self.image.is_none() {
            self.image = Some(NO_IMAGE.to_string());
        }
        self
    }
}

/// One page of the ad listing
#[derive(Debug, Serialize)]
pub struct AdPageResponse {
    pub items: Vec<AdResponse>,
    /// Number of the page actually served
    pub num_pages: u32,
    /// Total number of ads
    pub total: i64,
}

/// Last value of a repeated query parameter
///
/// Values stay text so unparsable pages fall back to the first page
/// instead of rejecting the request.
fn last_param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .rev()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Resolves the author and category of a request, failing with 404
async fn new_ad(state: &AppState, req: AdRequest) -> Result<NewAd, ApiError> {
    state
        .users
        .find_by_id(req.author)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User not found: {}", req.author)))?;

    state
        .categories
        .find_by_id(req.category)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Category not found: {}", req.category)))?;

    NewAd::new(
        req.name,
        req.author,
        req.category,
        req.price,
        req.description,
        req.is_published,
    )
    .map_err(ApiError::bad_request)
}

/// List ads by price, most expensive first
///
/// GET /ads?page=N
pub async fn list_ads(
    State(state): State<AppState>,
    QueryParam(params): QueryParam<Vec<(String, String)>>,
) -> Result<Json<AdPageResponse>, ApiError> {
    let total = state.ads.count().await?;
    let page = state.paginator.page(total, last_param(&params, PAGE_PARAM));

    let ads = state.ads.list_page(page.offset, page.limit).await?;
    let items = ads
        .into_iter()
        .map(|ad| AdResponse::new(ad, &state.media))
        .collect();

    Ok(Json(AdPageResponse {
        items,
        num_pages: page.number,
        total,
    }))
}

/// Get an ad by ID
///
/// GET /ads/:id
pub async fn get_ad(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<AdResponse>, ApiError> {
    let ad = state
        .ads
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Ad not found: {}", id)))?;

    Ok(Json(AdResponse::new(ad, &state.media)))
}

/// Create a new ad
///
/// POST /ads
pub async fn create_ad(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AdRequest>,
) -> Result<(StatusCode, Json<AdResponse>), ApiError> {
    let ad = new_ad(&state, req).await?;
    let created = state.ads.create(ad).await?;

    tracing::info!(ad_id = created.id, author_id = created.author_id, "Ad created");

    Ok((
        StatusCode::CREATED,
        Json(AdResponse::new(created, &state.media).with_image_placeholder()),
    ))
}

/// Overwrite every field of an ad except its image
///
/// PATCH /ads/:id
pub async fn update_ad(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(req): JsonBody<AdRequest>,
) -> Result<Json<AdResponse>, ApiError> {
    let ad = new_ad(&state, req).await?;
    let updated = state.ads.update(id, ad).await?;

    tracing::info!(ad_id = id, "Ad updated");

    Ok(Json(
        AdResponse::new(updated, &state.media).with_image_placeholder(),
    ))
}

/// Upload the image of an ad
///
/// POST /ads/:id/image (multipart, file field `image`)
pub async fn upload_ad_image(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AdResponse>, ApiError> {
    let current = state
        .ads
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Ad not found: {}", id)))?;

    let mut multipart = multipart?;
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload
        .ok_or_else(|| ApiError::bad_request(format!("Missing file field `{}`", IMAGE_FIELD)))?;

    let path = state
        .media
        .save_ad_image(file_name.as_deref(), &bytes)
        .await?;
    let updated = match state.ads.set_image(id, &path).await {
        Ok(ad) => ad,
        Err(e) => {
            discard_image(&state.media, &path).await;
            return Err(e.into());
        }
    };

    tracing::info!(ad_id = id, image = %path, "Ad image updated");

    if let Some(previous) = current.image.as_deref().filter(|p| *p != path) {
        discard_image(&state.media, previous).await;
    }

    Ok(Json(AdResponse::new(updated, &state.media)))
}

/// Removes an image file no ad refers to, logging failures
async fn discard_image(media: &MediaStorage, path: &str) {
    if let Err(e) = media.remove(path).await {
        tracing::warn!(image = %path, error = %e, "Failed to remove ad image");
    }
}

/// Delete an ad
///
/// DELETE /ads/:id
pub async fn delete_ad(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.ads.delete(id).await?;

    tracing::info!(ad_id = id, "Ad deleted");

    Ok(Json(StatusResponse::ok()))
}

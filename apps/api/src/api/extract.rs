//! Request extractors whose rejections are reported as JSON `ApiError`s

use axum::extract::{FromRequest, FromRequestParts};

use crate::api::errors::ApiError;

/// JSON body extractor
///
/// Missing fields, wrong types and malformed JSON become a 400 response
/// with an `{"error": ...}` body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Path parameter extractor with the same error shape as `JsonBody`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);

/// Query string extractor with the same error shape as `JsonBody`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParam<T>(pub T);

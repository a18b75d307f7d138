use axum::{
    extract::{rejection::JsonRejection, Json, State},
    routing::post,
    Router,
};
use busdesk_core::{FilterUpdate, SortKey};
use serde::Deserialize;
use crate::bookings::listing;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub key: SortKey,
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub page: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/filters", post(set_filter).delete(clear_filters))
        .route("/v1/sort", post(request_sort))
        .route("/v1/page", post(set_page))
}

/// POST /v1/filters
/// Merge one filter field, e.g. `{"field": "source", "value": "mmt"}`
async fn set_filter(
    State(state): State<AppState>,
    body: Result<Json<FilterRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(req) = body.map_err(AppError::from_rejection)?;
    let update = FilterUpdate::parse(&req.field, &req.value).map_err(AppError::from_core)?;
    let mut view = state.view.write().await;
    view.set_filter(update);
    listing(&view)
}

/// DELETE /v1/filters
async fn clear_filters(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut view = state.view.write().await;
    view.clear_filters();
    listing(&view)
}

/// POST /v1/sort
/// Column-header click
async fn request_sort(
    State(state): State<AppState>,
    body: Result<Json<SortRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(req) = body.map_err(AppError::from_rejection)?;
    let mut view = state.view.write().await;
    view.request_sort(req.key);
    listing(&view)
}

/// POST /v1/page
async fn set_page(
    State(state): State<AppState>,
    body: Result<Json<PageRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(req) = body.map_err(AppError::from_rejection)?;
    let mut view = state.view.write().await;
    view.set_page(req.page);
    listing(&view)
}

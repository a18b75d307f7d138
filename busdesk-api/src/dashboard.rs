use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use busdesk_core::Aggregates;
use serde::Serialize;
use tracing::info;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReseedResponse {
    pub loaded: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/v1/dashboard", get(get_dashboard))
        .route("/v1/reseed", post(reseed))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /v1/dashboard
/// KPI cards and chart series for the current filters
async fn get_dashboard(State(state): State<AppState>) -> Json<Aggregates> {
    let view = state.view.read().await;
    Json(view.aggregates())
}

/// POST /v1/reseed
/// Reload the collection from the configured feed
async fn reseed(
    State(state): State<AppState>,
) -> Result<Json<ReseedResponse>, AppError> {
    let bookings = state
        .feed
        .fetch_bookings()
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    let loaded = bookings.len();

    state.view.write().await.replace_records(bookings);
    info!("Reseeded dashboard with {} bookings", loaded);

    Ok(Json(ReseedResponse { loaded }))
}

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use busdesk_core::export::{self, EXPORT_FILENAME};
use busdesk_core::{BookingDetail, FilterConfig, PageView, SortConfig, ViewState};
use serde::{Deserialize, Serialize};
use tracing::info;
use crate::state::AppState;
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse<'a> {
    pub filters: &'a FilterConfig,
    pub sort: &'a SortConfig,
    pub export_enabled: bool,
    #[serde(flatten)]
    pub page: PageView<'a>,
}

impl<'a> BookingsResponse<'a> {
    pub fn from_view(view: &'a ViewState) -> Self {
        Self {
            filters: view.filters(),
            sort: view.sort(),
            export_enabled: view.export_enabled(),
            page: view.page_view(),
        }
    }
}

/// Serializes the current list view while the caller still holds the lock.
pub(crate) fn listing(view: &ViewState) -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(serde_json::to_value(BookingsResponse::from_view(view))?))
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub id: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", get(list_bookings))
        .route("/v1/bookings/export", get(export_bookings))
        .route(
            "/v1/selection",
            post(select_booking).get(get_selection).delete(clear_selection),
        )
}

/// GET /v1/bookings
/// Current page of the filtered and sorted bookings
async fn list_bookings(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let view = state.view.read().await;
    listing(&view)
}

/// GET /v1/bookings/export
/// CSV of every visible booking, or 204 when nothing is visible
async fn export_bookings(
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let rows = {
        let view = state.view.read().await;
        if !view.export_enabled() {
            info!("Export requested with no visible bookings");
            return Ok(StatusCode::NO_CONTENT.into_response());
        }
        view.export_rows()
    };

    let body = export::to_csv_bytes(&rows).map_err(AppError::from_core)?;
    info!("Exported {} bookings", rows.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
            ),
        ],
        body,
    )
        .into_response())
}

/// POST /v1/selection
/// Open the detail overlay for a booking
async fn select_booking(
    State(state): State<AppState>,
    body: Result<Json<SelectRequest>, JsonRejection>,
) -> Result<Json<BookingDetail>, AppError> {
    let Json(req) = body.map_err(AppError::from_rejection)?;
    let mut view = state.view.write().await;
    let record = view.select_for_detail(&req.id).map_err(AppError::from_core)?;
    Ok(Json(BookingDetail::from_record(record)))
}

/// GET /v1/selection
async fn get_selection(
    State(state): State<AppState>,
) -> Result<Json<BookingDetail>, AppError> {
    let view = state.view.read().await;
    view.detail()
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError("No booking selected".to_string()))
}

/// DELETE /v1/selection
async fn clear_selection(State(state): State<AppState>) -> StatusCode {
    state.view.write().await.clear_selection();
    StatusCode::NO_CONTENT
}

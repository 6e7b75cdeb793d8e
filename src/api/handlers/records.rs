//! Handlers for reading, retargeting and deleting records.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::record::{RecordRequest, RecordResponse, RecordStatsResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the public view of a record. Does not count as an access.
///
/// # Endpoint
///
/// `GET /shorten/{code}`
///
/// # Errors
///
/// - **404 Not Found**: no live record for `code`
pub async fn get_record_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<RecordResponse>, AppError> {
    let record = state.registry.get(&code).await?;
    Ok(Json(RecordResponse::from(&record)))
}

/// Replaces the destination of an existing record.
///
/// Code, creation time and access count are preserved.
///
/// # Endpoint
///
/// `PUT /shorten/{code}`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/new" }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: invalid URL
/// - **404 Not Found**: no live record for `code`
pub async fn update_record_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<RecordRequest>,
) -> Result<Json<RecordStatsResponse>, AppError> {
    payload.validate()?;

    let record = state.registry.update(&code, &payload.url).await?;

    Ok(Json(RecordStatsResponse::from(&record)))
}

/// Deletes a record.
///
/// # Endpoint
///
/// `DELETE /shorten/{code}`
///
/// # Response
///
/// **204 No Content**, also when the code was not live.
pub async fn delete_record_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.registry.delete(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the full view of a record including its access count.
///
/// # Endpoint
///
/// `GET /shorten/{code}/stats`
///
/// # Errors
///
/// - **404 Not Found**: no live record for `code`
pub async fn record_stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<RecordStatsResponse>, AppError> {
    let record = state.registry.get(&code).await?;
    Ok(Json(RecordStatsResponse::from(&record)))
}

//! Handler for record creation endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::record::{RecordRequest, RecordStatsResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a destination under a freshly generated short code.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// A URL without a scheme is stored with `https://` prepended.
///
/// # Response
///
/// **201 Created**
///
/// ```json
/// {
///   "id": "aZ3k9Q",
///   "url": "https://example.com/some/long/path",
///   "short_code": "aZ3k9Q",
///   "created_at": "2025-01-01T12:00:00Z",
///   "updated_at": "2025-01-01T12:00:00Z",
///   "access_count": 0
/// }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: URL empty, too long, or not http(s)
/// - **503 Service Unavailable**: storage failure or no free code found
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<RecordRequest>,
) -> Result<(StatusCode, Json<RecordStatsResponse>), AppError> {
    payload.validate()?;

    let record = state.registry.create(&payload.url).await?;

    Ok((StatusCode::CREATED, Json(RecordStatsResponse::from(&record))))
}

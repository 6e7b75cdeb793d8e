//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its destination and counts the access.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// The counter is incremented atomically with the lookup, so concurrent
/// redirects are never lost.
///
/// # Response
///
/// **302 Found** with `Location: <destination>`.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.registry.get_and_increment(&code).await?;

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, record.destination().to_string())],
    ))
}

//! Record API route configuration.

use crate::api::handlers::{
    delete_record_handler, get_record_handler, record_stats_handler, shorten_handler,
    update_record_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Record management routes.
///
/// # Endpoints
///
/// - `POST   /shorten`               - Create a record
/// - `GET    /shorten/{code}`        - Public view of a record
/// - `PUT    /shorten/{code}`        - Replace the destination
/// - `DELETE /shorten/{code}`        - Delete a record
/// - `GET    /shorten/{code}/stats`  - Record with access count
pub fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route(
            "/shorten/{code}",
            get(get_record_handler)
                .put(update_record_handler)
                .delete(delete_record_handler),
        )
        .route("/shorten/{code}/stats", get(record_stats_handler))
}

pub mod seat_maps;
pub mod seats;

use axum::http::StatusCode;
use axum::Router;
use std::sync::Arc;

use crate::error::{CommandError, ErrorKind};

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(seat_maps::routes())
        .merge(seats::routes())
}

/* ---------- helpers ---------- */

// Single place where the error taxonomy becomes status codes.
pub(crate) fn error_response(e: CommandError) -> (StatusCode, String) {
    let status = match e.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
    };
    (status, e.to_string())
}

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::patch,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::SeatMapCommands;
use crate::controllers::error_response;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seats/reserve", patch(reserve_seat))
        .route("/seats/release", patch(release_seat))
        .route("/seats/purchase", patch(confirm_purchase))
        .route("/seats/paid", patch(mark_paid))
}

// PATCH /api/seats/reserve
#[derive(Debug, Deserialize)]
struct ReserveSeatRequest {
    seat_map_id: Uuid,
    seat_id: Uuid,
    holder_id: String,
}

async fn reserve_seat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReserveSeatRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.holder_id.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "holder_id must not be empty".to_string()));
    }

    SeatMapCommands::new(state)
        .reserve_seat(req.seat_map_id, req.seat_id, &req.holder_id)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(json!({"message": "Seat reserved"}))))
}

// PATCH /api/seats/release
#[derive(Debug, Deserialize)]
struct ReleaseSeatRequest {
    seat_map_id: Uuid,
    seat_id: Uuid,
}

async fn release_seat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReleaseSeatRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    SeatMapCommands::new(state)
        .release_seat(req.seat_map_id, req.seat_id)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(json!({"message": "Seat released"}))))
}

// PATCH /api/seats/purchase
#[derive(Debug, Deserialize)]
struct ConfirmPurchaseRequest {
    seat_map_id: Uuid,
    seat_id: Uuid,
    holder_id: String,
}

async fn confirm_purchase(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConfirmPurchaseRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    SeatMapCommands::new(state)
        .confirm_purchase(req.seat_map_id, req.seat_id, &req.holder_id)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(json!({"message": "Purchase confirmed"}))))
}

// PATCH /api/seats/paid
#[derive(Debug, Deserialize)]
struct MarkPaidRequest {
    seat_map_id: Uuid,
    seat_id: Uuid,
}

async fn mark_paid(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MarkPaidRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    SeatMapCommands::new(state)
        .mark_paid(req.seat_map_id, req.seat_id)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(json!({"message": "Seat marked paid"}))))
}

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::SeatMapCommands;
use crate::controllers::error_response;
use crate::models::SeatStatus;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seat-maps", post(create_seat_map))
        .route("/seat-maps/{id}", get(get_seat_map))
        .route("/seat-maps/{id}/categories", post(add_category))
        .route("/seat-maps/{id}/seats", post(add_seat).get(get_seats))
        .route("/seat-maps/{id}/stream", get(stream_facts))
}

// POST /api/seat-maps
#[derive(Debug, Deserialize)]
struct CreateSeatMapRequest {
    event_id: i64,
}

#[derive(Debug, Serialize)]
struct CreateSeatMapResponse {
    id: Uuid,
}

async fn create_seat_map(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSeatMapRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.event_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "event_id must be > 0".to_string()));
    }

    let id = SeatMapCommands::new(state)
        .create_seat_map(req.event_id)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(CreateSeatMapResponse { id })))
}

// GET /api/seat-maps/{id}
#[derive(Debug, Serialize)]
struct SeatMapSummary {
    id: Uuid,
    event_id: i64,
    categories: usize,
    seats: usize,
    reserved: usize,
    occupied: usize,
}

async fn get_seat_map(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let map = SeatMapCommands::new(state)
        .get_seat_map(id)
        .await
        .map_err(error_response)?;

    let summary = SeatMapSummary {
        id: map.id(),
        event_id: map.event_id(),
        categories: map.categories().len(),
        seats: map.seats().len(),
        reserved: map
            .seats()
            .iter()
            .filter(|s| s.status == SeatStatus::Reserved)
            .count(),
        occupied: map
            .seats()
            .iter()
            .filter(|s| s.status == SeatStatus::Occupied)
            .count(),
    };
    Ok((StatusCode::OK, Json(summary)))
}

// POST /api/seat-maps/{id}/categories
#[derive(Debug, Deserialize)]
struct AddCategoryRequest {
    name: String,
    base_price: Option<f64>,
    #[serde(default)]
    has_priority: bool,
}

#[derive(Debug, Serialize)]
struct AddCategoryResponse {
    id: Uuid,
    name: String,
}

async fn add_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddCategoryRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "name must not be empty".to_string()));
    }

    let category = SeatMapCommands::new(state)
        .add_category(id, &req.name, req.base_price, req.has_priority)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(AddCategoryResponse {
            id: category.id,
            name: category.name,
        }),
    ))
}

// POST /api/seat-maps/{id}/seats
#[derive(Debug, Deserialize)]
struct AddSeatRequest {
    row: u32,
    number: u32,
    category: String,
}

#[derive(Debug, Serialize)]
struct AddSeatResponse {
    id: Uuid,
}

async fn add_seat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddSeatRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let seat = SeatMapCommands::new(state)
        .add_seat(id, req.row, req.number, &req.category)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(AddSeatResponse { id: seat.id })))
}

// GET /api/seat-maps/{id}/seats
#[derive(Debug, Deserialize)]
struct SeatsQuery {
    row: Option<u32>,
    status: Option<String>, // AVAILABLE, RESERVED, OCCUPIED
}

#[derive(Debug, Serialize)]
struct SeatResponse {
    id: Uuid,
    row: u32,
    number: u32,
    category: String,
    status: String,
    price: Option<f64>,
}

async fn get_seats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<SeatsQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let status_filter = match params.status.as_deref() {
        None => None,
        Some(s) => Some(SeatStatus::parse(s).ok_or((
            StatusCode::BAD_REQUEST,
            "status must be AVAILABLE | RESERVED | OCCUPIED".to_string(),
        ))?),
    };

    let map = SeatMapCommands::new(state)
        .get_seat_map(id)
        .await
        .map_err(error_response)?;

    let payload: Vec<SeatResponse> = map
        .seats()
        .iter()
        .filter(|s| params.row.map_or(true, |r| s.row == r))
        .filter(|s| status_filter.map_or(true, |st| s.status == st))
        .map(|s| SeatResponse {
            id: s.id,
            row: s.row,
            number: s.number,
            category: s.category.clone(),
            status: s.status.as_str().to_string(),
            price: map.seat_price(s.id).ok().flatten(),
        })
        .collect();

    Ok((StatusCode::OK, Json(payload)))
}

// GET /api/seat-maps/{id}/stream — realtime fact push for the seat map UI
#[derive(Debug, Deserialize)]
struct StreamQuery {
    event_id: i64,
}

async fn stream_facts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StreamQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let rx = state.realtime.subscribe(params.event_id);
    ws.on_upgrade(move |socket| relay_facts(socket, rx))
}

async fn relay_facts(
    mut socket: WebSocket,
    mut rx: tokio::sync::broadcast::Receiver<crate::models::Fact>,
) {
    loop {
        match rx.recv().await {
            Ok(fact) => {
                let Ok(payload) = serde_json::to_string(&fact) else {
                    continue;
                };
                if socket.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
            // Lagged subscribers re-fetch the map; a closed channel ends the
            // stream.
            Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
        }
    }
}

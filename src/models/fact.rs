use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable record of a committed state transition, published after the
/// seat map is saved. A closed enum so consumers can match exhaustively;
/// every variant carries the seat map and event ids for routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fact {
    SeatMapCreated {
        seat_map_id: Uuid,
        event_id: i64,
    },
    CategoryAdded {
        seat_map_id: Uuid,
        event_id: i64,
        name: String,
        has_priority: bool,
    },
    SeatAdded {
        seat_map_id: Uuid,
        event_id: i64,
        seat_id: Uuid,
        row: u32,
        number: u32,
        category: String,
    },
    SeatReserved {
        seat_map_id: Uuid,
        event_id: i64,
        seat_id: Uuid,
        row: u32,
        number: u32,
        holder_id: String,
    },
    SeatReleased {
        seat_map_id: Uuid,
        event_id: i64,
        seat_id: Uuid,
        row: u32,
        number: u32,
    },
    SeatPurchaseConfirmed {
        seat_map_id: Uuid,
        event_id: i64,
        seat_id: Uuid,
        row: u32,
        number: u32,
        holder_id: String,
    },
}

impl Fact {
    pub fn event_id(&self) -> i64 {
        match self {
            Fact::SeatMapCreated { event_id, .. }
            | Fact::CategoryAdded { event_id, .. }
            | Fact::SeatAdded { event_id, .. }
            | Fact::SeatReserved { event_id, .. }
            | Fact::SeatReleased { event_id, .. }
            | Fact::SeatPurchaseConfirmed { event_id, .. } => *event_id,
        }
    }

    pub fn seat_map_id(&self) -> Uuid {
        match self {
            Fact::SeatMapCreated { seat_map_id, .. }
            | Fact::CategoryAdded { seat_map_id, .. }
            | Fact::SeatAdded { seat_map_id, .. }
            | Fact::SeatReserved { seat_map_id, .. }
            | Fact::SeatReleased { seat_map_id, .. }
            | Fact::SeatPurchaseConfirmed { seat_map_id, .. } => *seat_map_id,
        }
    }
}

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Occupancy state machine of a single seat.
///
/// Available -> Reserved -> Occupied, with Reserved -> Available on release
/// or hold expiry. Occupied is terminal for the purchase lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    Reserved,
    Occupied,
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Available => "AVAILABLE",
            SeatStatus::Reserved => "RESERVED",
            SeatStatus::Occupied => "OCCUPIED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AVAILABLE" => Some(SeatStatus::Available),
            "RESERVED" => Some(SeatStatus::Reserved),
            "OCCUPIED" => Some(SeatStatus::Occupied),
            _ => None,
        }
    }
}

/// One physical seat. Invariant: `holder` is Some iff status is Reserved or
/// Occupied; `reserved_at` is Some iff status is Reserved. Enforced by the
/// owning [`SeatMap`](crate::models::SeatMap) — nothing outside the aggregate
/// mutates a seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub id: Uuid,
    pub row: u32,
    pub number: u32,
    /// Category name, resolved against the map's registry at creation time.
    pub category: String,
    pub status: SeatStatus,
    pub holder: Option<String>,
    pub reserved_at: Option<DateTime<Utc>>,
    pub paid: bool,
}

impl Seat {
    pub(crate) fn new(row: u32, number: u32, category: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            row,
            number,
            category,
            status: SeatStatus::Available,
            holder: None,
            reserved_at: None,
            paid: false,
        }
    }

    /// True iff the seat is Reserved and its hold has run out. Pure: "now"
    /// comes from the caller, never from the wall clock.
    pub fn hold_expired(&self, now: DateTime<Utc>, hold_duration: Duration) -> bool {
        match (self.status, self.reserved_at) {
            (SeatStatus::Reserved, Some(reserved_at)) => now - reserved_at >= hold_duration,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reserved_seat(reserved_at: DateTime<Utc>) -> Seat {
        let mut seat = Seat::new(1, 1, "General".to_string());
        seat.status = SeatStatus::Reserved;
        seat.holder = Some("user1".to_string());
        seat.reserved_at = Some(reserved_at);
        seat
    }

    #[test]
    fn hold_expires_exactly_at_duration() {
        let t0 = Utc::now();
        let seat = reserved_seat(t0);
        let hold = Duration::minutes(15);

        assert!(!seat.hold_expired(t0 + Duration::minutes(14), hold));
        assert!(seat.hold_expired(t0 + hold, hold));
        assert!(seat.hold_expired(t0 + hold + Duration::seconds(1), hold));
    }

    #[test]
    fn hold_never_expires_outside_reserved() {
        let long_ago = Utc::now() - Duration::days(365);
        let hold = Duration::minutes(15);

        let available = Seat::new(1, 1, "General".to_string());
        assert!(!available.hold_expired(Utc::now(), hold));

        // Stale timestamp on an Occupied seat still never expires.
        let mut stale = reserved_seat(long_ago);
        stale.status = SeatStatus::Occupied;
        assert!(!stale.hold_expired(Utc::now(), hold));
    }
}

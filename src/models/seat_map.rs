use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::{Category, Fact, Seat, SeatStatus};

/// Aggregate root owning all seats and categories for one event.
///
/// Methods here are pure in-memory state transitions: no I/O, no clock reads,
/// no locking. Mutual exclusion between concurrent commands lives at the
/// persistence boundary (see [`SeatMapStore`](crate::store::SeatMapStore));
/// this type only guarantees that every transition it accepts is legal and
/// that each accepted transition queues exactly one pending fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatMap {
    id: Uuid,
    event_id: i64,
    // Insertion-ordered; name-unique. Private so callers cannot bypass the
    // invariant checks below.
    categories: Vec<Category>,
    seats: Vec<Seat>,
    #[serde(skip)]
    pending: Vec<Fact>,
}

impl SeatMap {
    pub fn new(event_id: i64) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            event_id,
            categories: Vec::new(),
            seats: Vec::new(),
            pending: vec![Fact::SeatMapCreated {
                seat_map_id: id,
                event_id,
            }],
        }
    }

    /// Rebuild from persisted state. Pending facts always start empty: facts
    /// are drained by the command layer in the same load/save cycle that
    /// produced them, never persisted.
    pub fn from_parts(
        id: Uuid,
        event_id: i64,
        categories: Vec<Category>,
        seats: Vec<Seat>,
    ) -> Self {
        Self {
            id,
            event_id,
            categories,
            seats,
            pending: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn event_id(&self) -> i64 {
        self.event_id
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, seat_id: Uuid) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == seat_id)
    }

    /// Registers a new category. Name match is case-sensitive and exact.
    pub fn add_category(
        &mut self,
        name: &str,
        base_price: Option<f64>,
        has_priority: bool,
    ) -> Result<Category, DomainError> {
        if self.categories.iter().any(|c| c.name == name) {
            return Err(DomainError::DuplicateCategory(name.to_string()));
        }

        let category = Category::new(name.to_string(), base_price, has_priority);
        self.categories.push(category.clone());
        self.pending.push(Fact::CategoryAdded {
            seat_map_id: self.id,
            event_id: self.event_id,
            name: name.to_string(),
            has_priority,
        });

        Ok(category)
    }

    /// Adds a seat in Available state. The category must already be
    /// registered; (row, number) must be unique within the map.
    pub fn add_seat(
        &mut self,
        row: u32,
        number: u32,
        category_name: &str,
    ) -> Result<Seat, DomainError> {
        if row == 0 || number == 0 {
            return Err(DomainError::InvalidPosition);
        }
        if !self.categories.iter().any(|c| c.name == category_name) {
            return Err(DomainError::CategoryNotFound(category_name.to_string()));
        }
        if self.seats.iter().any(|s| s.row == row && s.number == number) {
            return Err(DomainError::DuplicateSeatPosition { row, number });
        }

        let seat = Seat::new(row, number, category_name.to_string());
        self.pending.push(Fact::SeatAdded {
            seat_map_id: self.id,
            event_id: self.event_id,
            seat_id: seat.id,
            row,
            number,
            category: category_name.to_string(),
        });
        self.seats.push(seat.clone());

        Ok(seat)
    }

    /// Places a time-bounded hold on an Available seat. This transition is
    /// the single-writer point of the whole core: under concurrent attempts
    /// at most one caller commits it (the store's conditional write decides
    /// the winner; losers re-load and land in the SeatNotAvailable arm).
    pub fn reserve_seat(
        &mut self,
        seat_id: Uuid,
        holder_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let (map_id, event_id) = (self.id, self.event_id);
        let seat = self
            .seats
            .iter_mut()
            .find(|s| s.id == seat_id)
            .ok_or(DomainError::SeatNotFound(seat_id))?;

        if seat.status != SeatStatus::Available {
            return Err(DomainError::SeatNotAvailable(seat_id));
        }

        seat.status = SeatStatus::Reserved;
        seat.holder = Some(holder_id.to_string());
        seat.reserved_at = Some(now);
        self.pending.push(Fact::SeatReserved {
            seat_map_id: map_id,
            event_id,
            seat_id,
            row: seat.row,
            number: seat.number,
            holder_id: holder_id.to_string(),
        });

        Ok(())
    }

    /// Returns a Reserved seat to Available. Idempotent: a seat that is not
    /// Reserved (already released, or Occupied) is left untouched with no
    /// fact queued — expiry sweeps and explicit cancellation race harmlessly.
    pub fn release_seat(&mut self, seat_id: Uuid) -> Result<(), DomainError> {
        let (map_id, event_id) = (self.id, self.event_id);
        let seat = self
            .seats
            .iter_mut()
            .find(|s| s.id == seat_id)
            .ok_or(DomainError::SeatNotFound(seat_id))?;

        if seat.status != SeatStatus::Reserved {
            return Ok(());
        }

        seat.status = SeatStatus::Available;
        seat.holder = None;
        seat.reserved_at = None;
        self.pending.push(Fact::SeatReleased {
            seat_map_id: map_id,
            event_id,
            seat_id,
            row: seat.row,
            number: seat.number,
        });

        Ok(())
    }

    /// Converts a hold into a purchase. Only the holder that reserved the
    /// seat may confirm; the paid flag stays false until payment is settled
    /// by a separate operation.
    pub fn confirm_purchase(
        &mut self,
        seat_id: Uuid,
        holder_id: &str,
    ) -> Result<(), DomainError> {
        let (map_id, event_id) = (self.id, self.event_id);
        let seat = self
            .seats
            .iter_mut()
            .find(|s| s.id == seat_id)
            .ok_or(DomainError::SeatNotFound(seat_id))?;

        if seat.status != SeatStatus::Reserved || seat.holder.as_deref() != Some(holder_id) {
            return Err(DomainError::SeatNotReservedByHolder(seat_id));
        }

        seat.status = SeatStatus::Occupied;
        seat.reserved_at = None;
        self.pending.push(Fact::SeatPurchaseConfirmed {
            seat_map_id: map_id,
            event_id,
            seat_id,
            row: seat.row,
            number: seat.number,
            holder_id: holder_id.to_string(),
        });

        Ok(())
    }

    /// Records payment settlement. No state transition and no fact; no-op if
    /// already paid.
    pub fn mark_paid(&mut self, seat_id: Uuid) -> Result<(), DomainError> {
        let seat = self
            .seats
            .iter_mut()
            .find(|s| s.id == seat_id)
            .ok_or(DomainError::SeatNotFound(seat_id))?;

        seat.paid = true;
        Ok(())
    }

    /// Ids of every Reserved seat whose hold timed out, for the expiry sweep.
    pub fn expired_seat_ids(&self, now: DateTime<Utc>, hold_duration: Duration) -> Vec<Uuid> {
        self.seats
            .iter()
            .filter(|s| s.hold_expired(now, hold_duration))
            .map(|s| s.id)
            .collect()
    }

    pub fn has_reserved_seats(&self) -> bool {
        self.seats.iter().any(|s| s.status == SeatStatus::Reserved)
    }

    /// Price of a seat, resolved at read time against the category registry.
    /// None when the category carries no base price; the caller applies the
    /// event-level default.
    pub fn seat_price(&self, seat_id: Uuid) -> Result<Option<f64>, DomainError> {
        let seat = self
            .seat(seat_id)
            .ok_or(DomainError::SeatNotFound(seat_id))?;
        let category = self
            .categories
            .iter()
            .find(|c| c.name == seat.category)
            .ok_or_else(|| DomainError::CategoryNotFound(seat.category.clone()))?;
        Ok(category.base_price)
    }

    /// Drains the facts queued since load. Called by the command layer only
    /// after the store confirmed the save.
    pub fn take_pending(&mut self) -> Vec<Fact> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[Fact] {
        &self.pending
    }
}

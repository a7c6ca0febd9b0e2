use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::SeatMap;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

/// A seat map together with the version the store handed it out at. The
/// version goes back into [`SeatMapStore::save`] unchanged.
#[derive(Debug)]
pub struct Versioned<T> {
    pub value: T,
    pub version: u64,
}

/// Persistence gateway for seat maps.
///
/// This boundary is where mutual exclusion lives: `save` is a conditional
/// write that succeeds only if the stored version still equals
/// `expected_version`. Two concurrent reserve attempts that both loaded
/// version N cannot both commit N+1 — the loser gets `VersionConflict`,
/// re-loads, and then finds the seat already Reserved. That is the whole
/// no-double-booking guarantee; the aggregate itself contains no locking.
#[async_trait]
pub trait SeatMapStore: Send + Sync {
    /// Persists a brand-new seat map at version 1.
    async fn create(&self, map: &SeatMap) -> Result<(), StoreError>;

    async fn load(&self, id: Uuid) -> Result<Versioned<SeatMap>, StoreError>;

    /// Conditional write: commits and bumps the version iff the stored
    /// version still equals `expected_version`.
    async fn save(&self, map: &SeatMap, expected_version: u64) -> Result<(), StoreError>;

    /// Seat maps with at least one Reserved seat, for the expiry sweep.
    async fn ids_with_reserved_seats(&self) -> Result<Vec<Uuid>, StoreError>;
}

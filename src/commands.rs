use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{CommandError, DomainError, StoreError};
use crate::models::{Category, Fact, Seat, SeatMap};
use crate::AppState;

// How many times a handler re-runs load-transition-save after losing the
// optimistic write race before giving up.
const MAX_SAVE_ATTEMPTS: u32 = 3;

/// Command handlers: one per inbound command. Each one loads the aggregate
/// through the store, invokes a single aggregate operation, saves with the
/// loaded version, and only after a confirmed save publishes the drained
/// facts. The aggregate never does I/O; this layer never does domain logic.
pub struct SeatMapCommands {
    state: Arc<AppState>,
}

impl SeatMapCommands {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn create_seat_map(&self, event_id: i64) -> Result<Uuid, CommandError> {
        let mut map = SeatMap::new(event_id);
        let id = map.id();
        self.state.store.create(&map).await?;
        self.publish_all(map.take_pending()).await;
        Ok(id)
    }

    pub async fn add_category(
        &self,
        seat_map_id: Uuid,
        name: &str,
        base_price: Option<f64>,
        has_priority: bool,
    ) -> Result<Category, CommandError> {
        self.run(seat_map_id, |map| {
            map.add_category(name, base_price, has_priority)
        })
        .await
    }

    pub async fn add_seat(
        &self,
        seat_map_id: Uuid,
        row: u32,
        number: u32,
        category_name: &str,
    ) -> Result<Seat, CommandError> {
        self.run(seat_map_id, |map| map.add_seat(row, number, category_name))
            .await
    }

    pub async fn reserve_seat(
        &self,
        seat_map_id: Uuid,
        seat_id: Uuid,
        holder_id: &str,
    ) -> Result<(), CommandError> {
        let now = self.state.clock.now();
        self.run(seat_map_id, |map| map.reserve_seat(seat_id, holder_id, now))
            .await
    }

    pub async fn release_seat(&self, seat_map_id: Uuid, seat_id: Uuid) -> Result<(), CommandError> {
        self.run(seat_map_id, |map| map.release_seat(seat_id)).await
    }

    pub async fn confirm_purchase(
        &self,
        seat_map_id: Uuid,
        seat_id: Uuid,
        holder_id: &str,
    ) -> Result<(), CommandError> {
        self.run(seat_map_id, |map| map.confirm_purchase(seat_id, holder_id))
            .await
    }

    pub async fn mark_paid(&self, seat_map_id: Uuid, seat_id: Uuid) -> Result<(), CommandError> {
        self.run(seat_map_id, |map| map.mark_paid(seat_id)).await
    }

    pub async fn get_seat_map(&self, seat_map_id: Uuid) -> Result<SeatMap, CommandError> {
        Ok(self.state.store.load(seat_map_id).await?.value)
    }

    /// Load-transition-save with bounded retry on optimistic conflict.
    ///
    /// A retry re-loads fresh state and re-runs the transition, so a caller
    /// that lost a reservation race fails with the domain's
    /// `SeatNotAvailable`, never with a raw store conflict.
    async fn run<T>(
        &self,
        seat_map_id: Uuid,
        op: impl Fn(&mut SeatMap) -> Result<T, DomainError>,
    ) -> Result<T, CommandError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let loaded = self.state.store.load(seat_map_id).await.map_err(map_load_err)?;
            let mut map = loaded.value;

            let out = op(&mut map)?;

            match self.state.store.save(&map, loaded.version).await {
                Ok(()) => {
                    self.publish_all(map.take_pending()).await;
                    return Ok(out);
                }
                Err(StoreError::VersionConflict(_)) if attempt < MAX_SAVE_ATTEMPTS => {
                    debug!(
                        %seat_map_id,
                        attempt, "optimistic save conflict, retrying against fresh state"
                    );
                    continue;
                }
                Err(e) => {
                    warn!(%seat_map_id, "save failed: {:?}", e);
                    return Err(e.into());
                }
            }
        }
    }

    async fn publish_all(&self, facts: Vec<Fact>) {
        for fact in &facts {
            self.state.notifier.publish(fact).await;
        }
    }
}

fn map_load_err(e: StoreError) -> CommandError {
    match e {
        StoreError::NotFound(id) => CommandError::Domain(DomainError::SeatMapNotFound(id)),
        other => CommandError::Store(other),
    }
}

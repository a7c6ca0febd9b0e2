use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::commands::SeatMapCommands;
use crate::AppState;

/// Periodic expiry sweep: releases every Reserved seat whose hold timed out.
///
/// Releases go through the normal `release_seat` command handler, so they
/// persist and notify exactly like any user-initiated release. A sweep that
/// races a purchase confirmation loses the optimistic write and simply finds
/// the seat no longer expired on retry; a sweep that races an explicit
/// release is a harmless idempotent no-op.
pub struct ExpirySweep {
    state: Arc<AppState>,
    commands: SeatMapCommands,
}

impl ExpirySweep {
    pub fn new(state: Arc<AppState>) -> Self {
        let commands = SeatMapCommands::new(state.clone());
        Self { state, commands }
    }

    pub async fn run_periodically(self) {
        let interval = Duration::from_secs(self.state.config.hold.sweep_interval_seconds);
        info!(
            "Expiry sweep running every {:?}, hold duration {} min",
            interval, self.state.config.hold.duration_minutes
        );
        loop {
            self.run_once().await;
            tokio::time::sleep(interval).await;
        }
    }

    /// One pass over every map with outstanding holds. Returns how many
    /// seats were released. A failing map is logged and skipped, it never
    /// stops the sweep.
    pub async fn run_once(&self) -> usize {
        let map_ids = match self.state.store.ids_with_reserved_seats().await {
            Ok(ids) => ids,
            Err(e) => {
                error!("Expiry sweep could not list seat maps: {:?}", e);
                return 0;
            }
        };

        let now = self.state.clock.now();
        let hold_duration = self.state.config.hold_duration();
        let mut released = 0;

        for map_id in map_ids {
            let map = match self.state.store.load(map_id).await {
                Ok(loaded) => loaded.value,
                Err(e) => {
                    error!("Expiry sweep failed to load map {}: {:?}", map_id, e);
                    continue;
                }
            };

            for seat_id in map.expired_seat_ids(now, hold_duration) {
                match self.commands.release_seat(map_id, seat_id).await {
                    Ok(()) => released += 1,
                    Err(e) => {
                        error!(
                            "Expiry sweep failed to release seat {} in map {}: {:?}",
                            seat_id, map_id, e
                        );
                    }
                }
            }
        }

        if released > 0 {
            info!("Expiry sweep released {} expired holds", released);
        }
        released
    }
}

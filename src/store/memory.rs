use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::SeatMap;
use crate::store::{SeatMapStore, Versioned};

/// In-memory gateway with the same optimistic semantics as the Postgres one.
/// Used by the test suite (including the concurrent-reservation race tests)
/// and by local runs without a DATABASE_URL.
#[derive(Default)]
pub struct InMemoryStore {
    maps: RwLock<HashMap<Uuid, (u64, SeatMap)>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SeatMapStore for InMemoryStore {
    async fn create(&self, map: &SeatMap) -> Result<(), StoreError> {
        let mut maps = self.maps.write().unwrap_or_else(|e| e.into_inner());
        maps.insert(map.id(), (1, map.clone()));
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Versioned<SeatMap>, StoreError> {
        let maps = self.maps.read().unwrap_or_else(|e| e.into_inner());
        let (version, map) = maps.get(&id).ok_or(StoreError::NotFound(id))?;
        Ok(Versioned {
            value: map.clone(),
            version: *version,
        })
    }

    async fn save(&self, map: &SeatMap, expected_version: u64) -> Result<(), StoreError> {
        let mut maps = self.maps.write().unwrap_or_else(|e| e.into_inner());
        let entry = maps
            .get_mut(&map.id())
            .ok_or(StoreError::NotFound(map.id()))?;

        // Compare-and-swap under the write lock: this is the commit point
        // every concurrent caller races for.
        if entry.0 != expected_version {
            return Err(StoreError::VersionConflict(map.id()));
        }
        *entry = (expected_version + 1, map.clone());
        Ok(())
    }

    async fn ids_with_reserved_seats(&self) -> Result<Vec<Uuid>, StoreError> {
        let maps = self.maps.read().unwrap_or_else(|e| e.into_inner());
        Ok(maps
            .values()
            .filter(|(_, m)| m.has_reserved_seats())
            .map(|(_, m)| m.id())
            .collect())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::database::Database;
use crate::error::StoreError;
use crate::models::{Category, Seat, SeatMap, SeatStatus};
use crate::store::{SeatMapStore, Versioned};

/// Postgres gateway. The version bump on `seat_maps` is the conditional
/// write that serializes concurrent commands on one map; categories and
/// seats are rewritten inside the same transaction so a loser never sees a
/// half-applied map.
#[derive(Clone)]
pub struct PostgresStore {
    db: Database,
}

impl PostgresStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn write_children(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        map: &SeatMap,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM seat_categories WHERE seat_map_id = $1")
            .bind(map.id())
            .execute(&mut **tx)
            .await?;
        sqlx::query("DELETE FROM seats WHERE seat_map_id = $1")
            .bind(map.id())
            .execute(&mut **tx)
            .await?;

        for (position, category) in map.categories().iter().enumerate() {
            sqlx::query(
                "INSERT INTO seat_categories (id, seat_map_id, position, name, base_price, has_priority)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(category.id)
            .bind(map.id())
            .bind(position as i32)
            .bind(&category.name)
            .bind(category.base_price)
            .bind(category.has_priority)
            .execute(&mut **tx)
            .await?;
        }

        for seat in map.seats() {
            sqlx::query(
                r#"INSERT INTO seats (id, seat_map_id, event_id, "row", number, category, status, holder, reserved_at, paid)
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#,
            )
            .bind(seat.id)
            .bind(map.id())
            .bind(map.event_id())
            .bind(seat.row as i32)
            .bind(seat.number as i32)
            .bind(&seat.category)
            .bind(seat.status.as_str())
            .bind(seat.holder.as_deref())
            .bind(seat.reserved_at)
            .bind(seat.paid)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl SeatMapStore for PostgresStore {
    async fn create(&self, map: &SeatMap) -> Result<(), StoreError> {
        let mut tx = self.db.pool.begin().await?;

        sqlx::query("INSERT INTO seat_maps (id, event_id, version) VALUES ($1, $2, 1)")
            .bind(map.id())
            .bind(map.event_id())
            .execute(&mut *tx)
            .await?;
        Self::write_children(&mut tx, map).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Versioned<SeatMap>, StoreError> {
        let map_row = sqlx::query("SELECT event_id, version FROM seat_maps WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db.pool)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        let event_id: i64 = map_row.get("event_id");
        let version: i64 = map_row.get("version");

        let categories = sqlx::query(
            "SELECT id, name, base_price, has_priority
             FROM seat_categories WHERE seat_map_id = $1 ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.db.pool)
        .await?
        .into_iter()
        .map(|row| Category {
            id: row.get("id"),
            name: row.get("name"),
            base_price: row.get("base_price"),
            has_priority: row.get("has_priority"),
        })
        .collect();

        let seats = sqlx::query(
            r#"SELECT id, "row", number, category, status, holder, reserved_at, paid
               FROM seats WHERE seat_map_id = $1 ORDER BY "row", number"#,
        )
        .bind(id)
        .fetch_all(&self.db.pool)
        .await?
        .into_iter()
        .map(|row| {
            let status: String = row.get("status");
            let reserved_at: Option<DateTime<Utc>> = row.get("reserved_at");
            Seat {
                id: row.get("id"),
                row: row.get::<i32, _>("row") as u32,
                number: row.get::<i32, _>("number") as u32,
                category: row.get("category"),
                status: SeatStatus::parse(&status).unwrap_or(SeatStatus::Available),
                holder: row.get("holder"),
                reserved_at,
                paid: row.get("paid"),
            }
        })
        .collect();

        Ok(Versioned {
            value: SeatMap::from_parts(id, event_id, categories, seats),
            version: version as u64,
        })
    }

    async fn save(&self, map: &SeatMap, expected_version: u64) -> Result<(), StoreError> {
        let mut tx = self.db.pool.begin().await?;

        let bumped = sqlx::query(
            "UPDATE seat_maps SET version = version + 1 WHERE id = $1 AND version = $2",
        )
        .bind(map.id())
        .bind(expected_version as i64)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if bumped == 0 {
            tx.rollback().await?;
            // Either gone or a concurrent writer got there first.
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM seat_maps WHERE id = $1)")
                    .bind(map.id())
                    .fetch_one(&self.db.pool)
                    .await?;
            return if exists {
                Err(StoreError::VersionConflict(map.id()))
            } else {
                Err(StoreError::NotFound(map.id()))
            };
        }

        Self::write_children(&mut tx, map).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn ids_with_reserved_seats(&self) -> Result<Vec<Uuid>, StoreError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT DISTINCT seat_map_id FROM seats WHERE status = 'RESERVED'",
        )
        .fetch_all(&self.db.pool)
        .await?;
        Ok(ids)
    }
}

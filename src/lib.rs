pub mod clock;
pub mod commands;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod models;
pub mod notifier;
pub mod redis_client;
pub mod services;
pub mod store;

use std::sync::Arc;

use clock::{Clock, SystemClock};
use notifier::{ChangeNotifier, FanoutNotifier, RealtimeHub, RedisNotifier};
use store::{InMemoryStore, PostgresStore, SeatMapStore};

// Shared state for the whole application. The store decides who wins a
// contended reservation; everything else hangs off it.
pub struct AppState {
    pub store: Arc<dyn SeatMapStore>,
    pub notifier: Arc<dyn ChangeNotifier>,
    pub realtime: Arc<RealtimeHub>,
    pub clock: Arc<dyn Clock>,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let store: Arc<dyn SeatMapStore> = match &config.database {
            Some(db_cfg) => {
                let db = database::Database::new(&db_cfg.url, db_cfg.pool_size).await?;
                db.run_migrations().await?;
                Arc::new(PostgresStore::new(db))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory seat map store");
                Arc::new(InMemoryStore::new())
            }
        };

        let realtime = Arc::new(RealtimeHub::new());
        let redis_notifier = match &config.redis {
            Some(redis_cfg) => {
                let redis = redis_client::RedisClient::new(&redis_cfg.url).await?;
                Some(RedisNotifier::new(redis))
            }
            None => None,
        };
        let notifier: Arc<dyn ChangeNotifier> =
            Arc::new(FanoutNotifier::new(realtime.clone(), redis_notifier));

        Ok(Arc::new(Self {
            store,
            notifier,
            realtime,
            clock: Arc::new(SystemClock),
            config,
        }))
    }

    /// State wired for tests: in-memory store, no redis, injectable clock.
    pub fn for_tests(clock: Arc<dyn Clock>) -> Arc<Self> {
        let realtime = Arc::new(RealtimeHub::new());
        Arc::new(Self {
            store: Arc::new(InMemoryStore::new()),
            notifier: Arc::new(FanoutNotifier::new(realtime.clone(), None)),
            realtime,
            clock,
            config: config::Config {
                app: config::AppConfig {
                    host: "127.0.0.1".to_string(),
                    port: 0,
                    environment: "test".to_string(),
                    rust_log: "seat_inventory=debug".to_string(),
                },
                database: None,
                redis: None,
                hold: config::HoldConfig {
                    duration_minutes: 15,
                    sweep_interval_seconds: 5,
                },
            },
        })
    }
}

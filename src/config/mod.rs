use serde::Deserialize;
use std::env;

// Top-level configuration container, filled from the environment once at
// startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: Option<DatabaseConfig>,
    pub redis: Option<RedisConfig>,
    pub hold: HoldConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

// Absent DATABASE_URL selects the in-memory store (tests, local runs).
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

// Absent REDIS_URL disables the inter-service channel; realtime push still
// works in-process.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

// Hold policy: how long a reservation survives without purchase confirmation
// and how often the expiry sweep runs. Never hard-coded in the aggregate.
#[derive(Debug, Clone, Deserialize)]
pub struct HoldConfig {
    pub duration_minutes: i64,
    pub sweep_interval_seconds: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .expect("PORT must be a valid number"),
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "seat_inventory=debug,tower_http=debug".to_string()),
            },
            database: env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
                url,
                pool_size: env::var("DB_POOL_SIZE")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .expect("DB_POOL_SIZE must be a valid number"),
            }),
            redis: env::var("REDIS_URL").ok().map(|url| RedisConfig { url }),
            hold: HoldConfig {
                duration_minutes: env::var("HOLD_DURATION_MINUTES")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()
                    .expect("HOLD_DURATION_MINUTES must be a valid number"),
                sweep_interval_seconds: env::var("HOLD_SWEEP_INTERVAL_SECONDS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .expect("HOLD_SWEEP_INTERVAL_SECONDS must be a valid number"),
            },
        }
    }

    pub fn hold_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.hold.duration_minutes)
    }
}

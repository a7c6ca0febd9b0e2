use redis::{aio::MultiplexedConnection, Client};

/// Shared connection used by the inter-service fact channel. Cloning the
/// multiplexed connection is cheap; every publisher clones its own handle.
#[derive(Clone)]
pub struct RedisClient {
    pub conn: MultiplexedConnection,
}

impl RedisClient {
    pub async fn new(redis_url: &str) -> redis::RedisResult<Self> {
        let client = Client::open(redis_url)?;
        let conn = client.get_multiplexed_tokio_connection().await?;
        Ok(RedisClient { conn })
    }
}

use async_trait::async_trait;
use tracing::warn;

use crate::models::Fact;
use crate::notifier::ChangeNotifier;
use crate::redis_client::RedisClient;

/// Inter-service notification over redis pub/sub, one channel per event so
/// subscribers (ticket issuance, reporting) can scope what they consume.
#[derive(Clone)]
pub struct RedisNotifier {
    redis: RedisClient,
}

impl RedisNotifier {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }

    fn channel(event_id: i64) -> String {
        format!("seat-facts:{}", event_id)
    }
}

#[async_trait]
impl ChangeNotifier for RedisNotifier {
    async fn publish(&self, fact: &Fact) {
        let payload = match serde_json::to_string(fact) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("failed to serialize fact for publish: {:?}", e);
                return;
            }
        };

        let mut conn = self.redis.conn.clone();
        // PUBLISH returns the subscriber count; we only care that it went out.
        let result: Result<i64, redis::RedisError> = redis::cmd("PUBLISH")
            .arg(Self::channel(fact.event_id()))
            .arg(payload)
            .query_async(&mut conn)
            .await;

        // Publish failure after a committed save is logged, never propagated:
        // the stored seat state stays the source of truth.
        if let Err(e) = result {
            warn!(event_id = fact.event_id(), "fact publish failed: {:?}", e);
        }
    }
}

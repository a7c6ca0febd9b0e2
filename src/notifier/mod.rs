use async_trait::async_trait;

use crate::models::Fact;

pub mod realtime;
pub mod redis;

pub use realtime::RealtimeHub;
pub use redis::RedisNotifier;

/// Publishes one committed fact to downstream consumers.
///
/// Called strictly after the store confirmed the save; a publish failure is
/// logged and swallowed, never rolled back — the persisted seat state is the
/// source of truth and consumers are expected to tolerate duplicate or
/// (rarely) lost notifications.
#[async_trait]
pub trait ChangeNotifier: Send + Sync {
    async fn publish(&self, fact: &Fact);
}

/// No-op notifier for unit tests and store-only tooling.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

#[async_trait]
impl ChangeNotifier for NoopNotifier {
    async fn publish(&self, _fact: &Fact) {}
}

/// Fans each fact out to the realtime UI hub and, when configured, the
/// inter-service redis channel.
pub struct FanoutNotifier {
    realtime: std::sync::Arc<RealtimeHub>,
    redis: Option<RedisNotifier>,
}

impl FanoutNotifier {
    pub fn new(realtime: std::sync::Arc<RealtimeHub>, redis: Option<RedisNotifier>) -> Self {
        Self { realtime, redis }
    }
}

#[async_trait]
impl ChangeNotifier for FanoutNotifier {
    async fn publish(&self, fact: &Fact) {
        self.realtime.publish(fact).await;
        if let Some(redis) = &self.redis {
            redis.publish(fact).await;
        }
    }
}

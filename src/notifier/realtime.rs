use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use crate::models::Fact;
use crate::notifier::ChangeNotifier;

const CHANNEL_CAPACITY: usize = 256;

/// In-process push channel for the realtime seat-map UI, one broadcast
/// channel per event id. Subscribers that lag past the channel capacity
/// miss facts; clients are expected to re-fetch the map on `Lagged`.
#[derive(Default)]
pub struct RealtimeHub {
    channels: Mutex<HashMap<i64, broadcast::Sender<Fact>>>,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to all facts for one event, e.g. from a websocket handler.
    pub fn subscribe(&self, event_id: i64) -> broadcast::Receiver<Fact> {
        let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        channels
            .entry(event_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }
}

#[async_trait]
impl ChangeNotifier for RealtimeHub {
    async fn publish(&self, fact: &Fact) {
        let sender = {
            let channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
            channels.get(&fact.event_id()).cloned()
        };
        match sender {
            // send only errors when nobody is subscribed; that is fine.
            Some(sender) => {
                let _ = sender.send(fact.clone());
            }
            None => debug!(event_id = fact.event_id(), "no realtime subscribers"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn subscribers_receive_facts_for_their_event_only() {
        let hub = RealtimeHub::new();
        let mut rx1 = hub.subscribe(1);
        let mut rx2 = hub.subscribe(2);

        let fact = Fact::SeatReleased {
            seat_map_id: Uuid::new_v4(),
            event_id: 1,
            seat_id: Uuid::new_v4(),
            row: 1,
            number: 1,
        };
        hub.publish(&fact).await;

        assert_eq!(rx1.recv().await.unwrap(), fact);
        assert!(rx2.try_recv().is_err());
    }
}

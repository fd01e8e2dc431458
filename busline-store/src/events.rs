use async_trait::async_trait;
use busline_core::events::EventPublisher;
use busline_core::repository::StoreError;
use busline_shared::models::events::DomainEvent;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// In-process fan-out of booking events
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl EventPublisher for EventBus {
    async fn publish(&self, event: DomainEvent) -> Result<(), StoreError> {
        let topic = event.topic();
        let payload = serde_json::to_string(&event)?;

        match self.tx.send(event) {
            Ok(receivers) => info!("Sent event to {} ({} subscribers): {}", topic, receivers, payload),
            // No subscriber is not a failure
            Err(_) => debug!("No subscribers for {}: {}", topic, payload),
        }
        Ok(())
    }
}

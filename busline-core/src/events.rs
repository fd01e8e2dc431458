use async_trait::async_trait;
use busline_shared::models::events::DomainEvent;

use crate::repository::StoreError;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: DomainEvent) -> Result<(), StoreError>;
}

/// Publisher that drops every event
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, _event: DomainEvent) -> Result<(), StoreError> {
        Ok(())
    }
}

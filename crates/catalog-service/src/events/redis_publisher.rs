//! Redis pub/sub publisher.

use super::ProductEventPublisher;
use async_trait::async_trait;
use catalog_core::{CatalogError, CatalogResult, DomainEvent, ProductCreated};
use deadpool_redis::{redis::AsyncCommands, Pool};
use shaku::Component;
use std::sync::Arc;
use tracing::debug;

/// Publishes events with `PUBLISH <channel> <json>`.
#[derive(Component)]
#[shaku(interface = ProductEventPublisher)]
pub struct RedisProductEventPublisher {
    pool: Option<Arc<Pool>>,
    channel: String,
}

impl RedisProductEventPublisher {
    #[must_use]
    pub fn new(pool: Arc<Pool>, channel: impl Into<String>) -> Self {
        Self {
            pool: Some(pool),
            channel: channel.into(),
        }
    }

    /// Channel the events are published on.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

#[async_trait]
impl ProductEventPublisher for RedisProductEventPublisher {
    async fn publish_created(&self, event: &ProductCreated) -> CatalogResult<()> {
        let pool = self
            .pool
            .as_ref()
            .ok_or_else(|| CatalogError::internal("Redis publisher has no connection pool"))?;

        let payload = event.to_json()?;
        let mut conn = pool
            .get()
            .await
            .map_err(|e| CatalogError::internal(format!("Failed to get Redis connection: {}", e)))?;

        let receivers: i64 = conn
            .publish(&self.channel, payload)
            .await
            .map_err(|e| CatalogError::internal(format!("Failed to publish to '{}': {}", self.channel, e)))?;

        debug!(
            "Published {} for product {} to '{}' ({} receivers)",
            event.event_type(),
            event.product_id,
            self.channel,
            receivers
        );
        Ok(())
    }
}

impl std::fmt::Debug for RedisProductEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisProductEventPublisher")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

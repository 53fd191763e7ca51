//! Publisher interface.

use async_trait::async_trait;
use catalog_core::{CatalogResult, Interface, ProductCreated};
use tracing::debug;

/// Publishes product lifecycle events.
#[async_trait]
pub trait ProductEventPublisher: Interface + Send + Sync {
    /// Announces that a product was persisted.
    async fn publish_created(&self, event: &ProductCreated) -> CatalogResult<()>;
}

/// Publisher used when messaging is switched off.
#[derive(Debug, Default)]
pub struct NoopProductEventPublisher;

#[async_trait]
impl ProductEventPublisher for NoopProductEventPublisher {
    async fn publish_created(&self, event: &ProductCreated) -> CatalogResult<()> {
        debug!("Messaging disabled, dropping created event for product {}", event.product_id);
        Ok(())
    }
}

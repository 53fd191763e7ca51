//! Subscriber for product created events.

use catalog_core::{CatalogError, CatalogResult, ProductCreated};
use redis::Client;
use futures::StreamExt;
use std::future::Future;
use tracing::{info, warn};

/// Subscribes to the created-event channel and logs every event it receives.
pub struct ProductEventListener {
    client: Client,
    channel: String,
}

impl ProductEventListener {
    /// Creates a listener for `channel` on the Redis server at `url`.
    pub fn new(url: &str, channel: impl Into<String>) -> CatalogResult<Self> {
        let client = Client::open(url)
            .map_err(|e| CatalogError::Configuration(format!("Invalid Redis URL: {}", e)))?;

        Ok(Self {
            client,
            channel: channel.into(),
        })
    }

    /// Receives events until `shutdown` resolves or the connection drops.
    pub async fn run<F>(self, shutdown: F) -> CatalogResult<()>
    where
        F: Future<Output = ()> + Send,
    {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| CatalogError::internal(format!("Failed to open subscription: {}", e)))?;

        pubsub
            .subscribe(&self.channel)
            .await
            .map_err(|e| CatalogError::internal(format!("Failed to subscribe to '{}': {}", self.channel, e)))?;

        info!("Listening for product events on '{}'", self.channel);

        let messages = pubsub.on_message();
        tokio::pin!(messages);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Product event listener stopping");
                    return Ok(());
                }
                message = messages.next() => {
                    let Some(message) = message else {
                        warn!("Subscription to '{}' closed", self.channel);
                        return Ok(());
                    };

                    match message.get_payload::<String>() {
                        Ok(payload) => Self::handle_payload(&payload),
                        Err(e) => warn!("Unreadable message on '{}': {}", self.channel, e),
                    }
                }
            }
        }
    }

    /// Decodes and logs one message. Malformed payloads are logged and dropped.
    pub fn handle_payload(payload: &str) {
        match Self::decode(payload) {
            Ok(event) => info!(
                product_id = %event.product_id,
                name = %event.name,
                price = event.price,
                enabled = event.enabled,
                "Product created"
            ),
            Err(e) => warn!("Discarding malformed product event: {}", e),
        }
    }

    /// Decodes a created-event payload.
    pub fn decode(payload: &str) -> CatalogResult<ProductCreated> {
        ProductCreated::from_json(payload)
    }
}

impl std::fmt::Debug for ProductEventListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductEventListener")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

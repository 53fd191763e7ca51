//! Product-related domain events.

use crate::{CatalogResult, DomainEvent, Product, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event emitted after a new product has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreated {
    pub product_id: ProductId,
    pub name: String,
    pub price: f64,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

impl ProductCreated {
    #[must_use]
    pub fn new(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            enabled: product.enabled,
            created_at: product.created_at,
            timestamp: Utc::now(),
        }
    }

    /// Parses an event received from the message channel.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl DomainEvent for ProductCreated {
    fn event_type(&self) -> &'static str {
        "product.created"
    }

    fn aggregate_id(&self) -> String {
        self.product_id.to_string()
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn to_json(&self) -> CatalogResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

//! Product entity.

use crate::ProductId;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A product that has not been persisted yet.
///
/// The store assigns the identifier on insert; `created_at` is stamped here
/// once and never changes afterwards. The stamp is kept at microsecond
/// precision, the finest the `DATETIME(6)` column holds, so a product read
/// back from the store equals the one that was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl NewProduct {
    /// Creates a new product stamped with the current time.
    #[must_use]
    pub fn new(name: String, price: f64, enabled: bool) -> Self {
        Self {
            name,
            price,
            enabled,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Attaches the store-assigned identifier.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            enabled: self.enabled,
            created_at: self.created_at,
        }
    }
}

/// Product entity. The relational store is the system of record for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier.
    pub id: ProductId,

    /// Display name, never blank.
    pub name: String,

    /// Unit price, never negative.
    pub price: f64,

    /// Whether the product is offered.
    pub enabled: bool,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Renames the product.
    pub fn rename(&mut self, name: String) {
        self.name = name;
    }

    /// Changes the unit price.
    pub fn reprice(&mut self, price: f64) {
        self.price = price;
    }

    /// Enables or disables the product.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

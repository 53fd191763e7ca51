//! Product DTOs.

use catalog_core::{Product, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a new product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(custom(function = "catalog_core::rules::not_blank"))]
    #[schema(example = "Widget")]
    pub name: String,

    #[validate(range(min = 0.0, message = "must not be negative"))]
    #[schema(example = 9.99)]
    pub price: f64,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Partial update of a product. Only the fields that are present are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(custom(function = "catalog_core::rules::not_blank"))]
    pub name: Option<String>,

    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: Option<f64>,

    pub enabled: Option<bool>,
}

impl UpdateProductRequest {
    /// Returns true when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.enabled.is_none()
    }
}

/// Product response. Also the payload stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[schema(value_type = i64, example = 1)]
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            enabled: product.enabled,
            created_at: product.created_at,
        }
    }
}

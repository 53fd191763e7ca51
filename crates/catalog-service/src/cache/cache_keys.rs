//! Cache key generators for consistent key naming.
//!
//! The formats are shared with every other process that reads or sweeps the
//! same Redis instance and must not change.

use catalog_core::{PageRequest, ProductId};

/// Namespace for single-product entries.
pub const PRODUCT_PREFIX: &str = "product::";

/// Namespace for page entries.
pub const PRODUCTS_PREFIX: &str = "products::";

/// Generate the cache key for a product by ID.
#[must_use]
pub fn product(id: ProductId) -> String {
    format!("{}{}", PRODUCT_PREFIX, id)
}

/// Generate the cache key for a page of products.
#[must_use]
pub fn product_page(page: &PageRequest) -> String {
    format!("{}{}:{}", PRODUCTS_PREFIX, page.page, page.size)
}

/// Pattern matching every cached product page.
#[must_use]
pub fn product_pages_pattern() -> String {
    format!("{}*", PRODUCTS_PREFIX)
}

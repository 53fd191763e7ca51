//! Read-through cache for products and product pages.
//!
//! Entries are JSON encoded [`ProductResponse`] values. A page entry holds only
//! the content list, so a page rebuilt from the cache reports
//! `total_elements == content.len()` rather than the store total.

use super::{cache_keys, CacheInterface};
use crate::dto::ProductResponse;
use async_trait::async_trait;
use catalog_core::{CatalogResult, Interface, Page, PageRequest, ProductId};
use serde::de::DeserializeOwned;
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Time-to-live for product and page entries (10 minutes).
pub const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(600);

/// Product cache operations used by the product service.
#[async_trait]
pub trait ProductCache: Interface + Send + Sync {
    /// Stores a product under its id.
    async fn save_product(&self, product: &ProductResponse) -> CatalogResult<()>;

    /// Looks up a product. Corrupt entries are removed and reported as a miss.
    async fn find_product(&self, id: ProductId) -> CatalogResult<Option<ProductResponse>>;

    /// Stores the content of a page under its page key.
    async fn save_page(&self, page: &PageRequest, products: &Page<ProductResponse>) -> CatalogResult<()>;

    /// Looks up a page. Corrupt entries are removed and reported as a miss.
    async fn find_page(&self, page: &PageRequest) -> CatalogResult<Option<Page<ProductResponse>>>;

    /// Removes a product entry. A missing entry is not an error.
    async fn evict_product(&self, id: ProductId) -> CatalogResult<()>;

    /// Removes every cached page, returning how many were removed.
    async fn clear_product_pages(&self) -> CatalogResult<u64>;
}

/// [`ProductCache`] on top of any [`CacheInterface`] backend.
///
/// Every entry is written with [`PRODUCT_CACHE_TTL`]; other readers of the
/// same keys rely on that expiry, so it is not configurable.
#[derive(Component)]
#[shaku(interface = ProductCache)]
pub struct ProductCacheRepository {
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
}

impl ProductCacheRepository {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>) -> Self {
        Self { cache }
    }

    /// Reads and decodes a key, deleting the entry if it does not decode.
    async fn read<T: DeserializeOwned + Send>(&self, key: &str) -> CatalogResult<Option<T>> {
        let Some(json) = self.cache.get_raw(key).await? else {
            debug!("Product cache miss: {}", key);
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(value) => {
                debug!("Product cache hit: {}", key);
                Ok(Some(value))
            }
            Err(e) => {
                warn!("Evicting corrupt cache entry '{}': {}", key, e);
                self.cache.delete(key).await?;
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl ProductCache for ProductCacheRepository {
    async fn save_product(&self, product: &ProductResponse) -> CatalogResult<()> {
        let json = serde_json::to_string(product)?;
        self.cache
            .set_raw(&cache_keys::product(product.id), &json, PRODUCT_CACHE_TTL)
            .await
    }

    async fn find_product(&self, id: ProductId) -> CatalogResult<Option<ProductResponse>> {
        self.read(&cache_keys::product(id)).await
    }

    async fn save_page(&self, page: &PageRequest, products: &Page<ProductResponse>) -> CatalogResult<()> {
        let json = serde_json::to_string(&products.content)?;
        self.cache
            .set_raw(&cache_keys::product_page(page), &json, PRODUCT_CACHE_TTL)
            .await
    }

    async fn find_page(&self, page: &PageRequest) -> CatalogResult<Option<Page<ProductResponse>>> {
        let content: Option<Vec<ProductResponse>> = self.read(&cache_keys::product_page(page)).await?;

        Ok(content.map(|content| {
            let total = content.len() as u64;
            Page::new(content, page.page, page.size, total)
        }))
    }

    async fn evict_product(&self, id: ProductId) -> CatalogResult<()> {
        self.cache.delete(&cache_keys::product(id)).await?;
        Ok(())
    }

    async fn clear_product_pages(&self) -> CatalogResult<u64> {
        let removed = self
            .cache
            .delete_pattern(&cache_keys::product_pages_pattern())
            .await?;
        debug!("Cleared {} cached product pages", removed);
        Ok(removed)
    }
}

impl std::fmt::Debug for ProductCacheRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductCacheRepository")
            .field("ttl", &PRODUCT_CACHE_TTL)
            .finish_non_exhaustive()
    }
}

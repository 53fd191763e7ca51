//! Caching infrastructure for the service layer.
//!
//! A backend-neutral [`CacheInterface`] with Redis and in-memory backends,
//! and the product read-through cache built on top of it.

mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod product_cache;
mod redis_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use memory_cache::InMemoryCache;
pub use product_cache::{ProductCache, ProductCacheRepository, PRODUCT_CACHE_TTL};
pub use redis_cache::{create_redis_pool, RedisCacheService, RedisCacheServiceParameters};

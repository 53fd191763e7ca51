//! Dependency injection module using Shaku.
//!
//! `CatalogModule` holds the whole single-process graph: the MySQL pool and
//! product store, the Redis cache and product cache, the created-event
//! publisher and the product service on top.

use catalog_config::AppConfig;
use catalog_core::{module, HasComponent, HealthCheck};
use catalog_repository::{DatabasePool, DatabasePoolInterface, DatabasePoolParameters, MySqlProductRepository};
use catalog_service::{
    CacheInterface, NoopProductEventPublisher, ProductCacheRepository, ProductEventPublisher,
    ProductService, ProductServiceImpl, RedisCacheService, RedisCacheServiceParameters,
    RedisProductEventPublisher, RedisProductEventPublisherParameters, PRODUCT_CACHE_TTL,
};
use deadpool_redis::Pool;
use sqlx::MySqlPool;
use std::sync::Arc;
use tracing::{info, warn};

module! {
    pub CatalogModule {
        components = [
            DatabasePool,
            MySqlProductRepository,
            RedisCacheService,
            ProductCacheRepository,
            RedisProductEventPublisher,
            ProductServiceImpl,
        ],
        providers = [],
    }
}

/// Builds the module from configuration and already-opened pools.
///
/// A `None` Redis pool turns the cache into a pass-through. Created events
/// are only published when messaging is enabled and Redis is available;
/// otherwise the publisher is replaced by a no-op.
pub fn build_catalog_module(config: &AppConfig, db_pool: MySqlPool, redis_pool: Option<Arc<Pool>>) -> Arc<CatalogModule> {
    let publish_events = config.messaging.enabled && redis_pool.is_some();
    if config.messaging.enabled && !publish_events {
        warn!("Messaging is enabled but Redis is not; created events will be dropped");
    }

    let mut builder = CatalogModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters { pool: db_pool })
        .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters {
            pool: redis_pool.clone(),
        })
        .with_component_parameters::<RedisProductEventPublisher>(RedisProductEventPublisherParameters {
            pool: redis_pool,
            channel: config.messaging.product_created_channel.clone(),
        });

    if !publish_events {
        builder = builder.with_component_override::<dyn ProductEventPublisher>(Box::new(NoopProductEventPublisher));
    }

    info!(
        "Catalog module built (cache TTL {}s, events {})",
        PRODUCT_CACHE_TTL.as_secs(),
        if publish_events { "published" } else { "dropped" }
    );
    Arc::new(builder.build())
}

/// Dependencies probed by the readiness endpoint.
pub fn health_checks(db_pool: MySqlPool, redis_pool: Option<Arc<Pool>>) -> Vec<Arc<dyn HealthCheck>> {
    let cache = match redis_pool {
        Some(pool) => RedisCacheService::new(pool),
        None => RedisCacheService::disabled(),
    };

    vec![
        Arc::new(DatabasePool::with_pool(db_pool)),
        Arc::new(cache),
    ]
}

/// Trait for resolving the services the server needs from a module.
pub trait ServiceResolver {
    /// Resolves the product service from the module.
    fn product_service(&self) -> Arc<dyn ProductService>;

    /// Resolves the database pool from the module.
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;
}

impl ServiceResolver for CatalogModule {
    fn product_service(&self) -> Arc<dyn ProductService> {
        self.resolve()
    }

    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }
}

//! Product service implementation.

use crate::cache::ProductCache;
use crate::dto::{CreateProductRequest, ProductResponse, UpdateProductRequest};
use crate::events::ProductEventPublisher;
use crate::mappers;
use crate::product_service::ProductService;
use async_trait::async_trait;
use catalog_core::{CatalogError, CatalogResult, NewProduct, Page, PageRequest, ProductCreated, ProductId, ValidateExt};
use catalog_repository::ProductRepository;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Product service backed by the store, the product cache and the publisher.
#[derive(Component)]
#[shaku(interface = ProductService)]
pub struct ProductServiceImpl {
    #[shaku(inject)]
    product_repository: Arc<dyn ProductRepository>,
    #[shaku(inject)]
    product_cache: Arc<dyn ProductCache>,
    #[shaku(inject)]
    publisher: Arc<dyn ProductEventPublisher>,
}

impl ProductServiceImpl {
    /// Creates a new product service.
    pub fn new(
        product_repository: Arc<dyn ProductRepository>,
        product_cache: Arc<dyn ProductCache>,
        publisher: Arc<dyn ProductEventPublisher>,
    ) -> Self {
        Self {
            product_repository,
            product_cache,
            publisher,
        }
    }
}

#[async_trait]
impl ProductService for ProductServiceImpl {
    async fn create_product(&self, request: CreateProductRequest) -> CatalogResult<ProductResponse> {
        debug!("Creating product: {}", request.name);

        request.validate_request()?;

        let draft = NewProduct::new(request.name, request.price, request.enabled);
        let product = self.product_repository.save(&draft).await?;

        info!("Product created: {}", product.id);

        // Cached pages are not cleared here; they catch up on expiry or the next update/delete.

        if let Err(e) = self.publisher.publish_created(&ProductCreated::new(&product)).await {
            warn!("Product {} persisted but notification failed: {}", product.id, e);
            return Err(CatalogError::Notification {
                product_id: product.id.into_inner(),
                message: e.to_string(),
            });
        }

        Ok(ProductResponse::from(product))
    }

    async fn get_product(&self, id: ProductId) -> CatalogResult<ProductResponse> {
        debug!("Getting product: {}", id);

        if let Some(cached) = self.product_cache.find_product(id).await? {
            return Ok(cached);
        }

        let product = self
            .product_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", id))?;

        let response = ProductResponse::from(product);
        self.product_cache.save_product(&response).await?;

        Ok(response)
    }

    async fn list_products(&self, page: PageRequest) -> CatalogResult<Page<ProductResponse>> {
        debug!("Listing products, page: {}, size: {}", page.page, page.size);

        if let Some(cached) = self.product_cache.find_page(&page).await? {
            return Ok(cached);
        }

        let products = self.product_repository.find_all(page).await?;
        let response = mappers::to_response_page(products);
        self.product_cache.save_page(&page, &response).await?;

        Ok(response)
    }

    async fn update_product(&self, id: ProductId, request: UpdateProductRequest) -> CatalogResult<ProductResponse> {
        debug!("Updating product: {}", id);

        request.validate_request()?;

        let mut product = self
            .product_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", id))?;

        mappers::apply_update(&mut product, request);

        let updated = self.product_repository.update(&product).await?;
        let response = ProductResponse::from(updated);

        self.product_cache.save_product(&response).await?;
        self.product_cache.clear_product_pages().await?;

        info!("Product updated: {}", id);
        Ok(response)
    }

    async fn delete_product(&self, id: ProductId) -> CatalogResult<()> {
        debug!("Deleting product: {}", id);

        let existed = self.product_repository.delete(id).await?;

        self.product_cache.evict_product(id).await?;
        self.product_cache.clear_product_pages().await?;

        if existed {
            info!("Product deleted: {}", id);
        } else {
            debug!("Delete of unknown product {} ignored", id);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ProductServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheInterface, InMemoryCache, ProductCacheRepository, PRODUCT_CACHE_TTL};
    use catalog_core::Product;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock product repository counting reads.
    #[derive(Default)]
    struct MockProductRepository {
        products: Mutex<BTreeMap<i64, Product>>,
        next_id: Mutex<i64>,
        find_calls: AtomicUsize,
        list_calls: AtomicUsize,
    }

    impl MockProductRepository {
        fn find_calls(&self) -> usize {
            self.find_calls.load(Ordering::SeqCst)
        }

        fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        fn stored(&self, id: ProductId) -> Option<Product> {
            self.products.lock().unwrap().get(&id.into_inner()).cloned()
        }
    }

    #[async_trait]
    impl ProductRepository for MockProductRepository {
        async fn save(&self, product: &NewProduct) -> CatalogResult<Product> {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let saved = product.clone().with_id(ProductId(*next_id));
            self.products.lock().unwrap().insert(*next_id, saved.clone());
            Ok(saved)
        }

        async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
            self.find_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.stored(id))
        }

        async fn find_all(&self, page: PageRequest) -> CatalogResult<Page<Product>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            let products = self.products.lock().unwrap();
            let items = products
                .values()
                .skip(page.offset())
                .take(page.limit())
                .cloned()
                .collect();
            Ok(Page::new(items, page.page, page.size, products.len() as u64))
        }

        async fn update(&self, product: &Product) -> CatalogResult<Product> {
            self.products
                .lock()
                .unwrap()
                .insert(product.id.into_inner(), product.clone());
            Ok(product.clone())
        }

        async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
            Ok(self.products.lock().unwrap().remove(&id.into_inner()).is_some())
        }

        async fn count(&self) -> CatalogResult<u64> {
            Ok(self.products.lock().unwrap().len() as u64)
        }
    }

    /// Publisher that records events, or fails every publish.
    #[derive(Default)]
    struct RecordingPublisher {
        events: Mutex<Vec<ProductCreated>>,
        fail: bool,
    }

    #[async_trait]
    impl ProductEventPublisher for RecordingPublisher {
        async fn publish_created(&self, event: &ProductCreated) -> CatalogResult<()> {
            if self.fail {
                return Err(CatalogError::internal("broker unavailable"));
            }
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    struct Fixture {
        repo: Arc<MockProductRepository>,
        cache: Arc<InMemoryCache>,
        publisher: Arc<RecordingPublisher>,
        service: ProductServiceImpl,
    }

    fn fixture_with(publisher: RecordingPublisher) -> Fixture {
        let repo = Arc::new(MockProductRepository::default());
        let cache = Arc::new(InMemoryCache::new());
        let publisher = Arc::new(publisher);
        let service = ProductServiceImpl::new(
            repo.clone(),
            Arc::new(ProductCacheRepository::new(cache.clone())),
            publisher.clone(),
        );
        Fixture {
            repo,
            cache,
            publisher,
            service,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(RecordingPublisher::default())
    }

    fn widget() -> CreateProductRequest {
        CreateProductRequest {
            name: "Widget".to_string(),
            price: 9.99,
            enabled: true,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_reads_store_once() {
        let f = fixture();

        let created = f.service.create_product(widget()).await.unwrap();
        assert_eq!(created.id, ProductId(1));
        assert_eq!(created.name, "Widget");
        assert_eq!(created.price, 9.99);
        assert!(created.enabled);

        let fetched = f.service.get_product(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(f.repo.find_calls(), 1);

        let again = f.service.get_product(created.id).await.unwrap();
        assert_eq!(again, created);
        assert_eq!(f.repo.find_calls(), 1);
    }

    #[tokio::test]
    async fn test_create_publishes_without_touching_cache() {
        let f = fixture();

        let created = f.service.create_product(widget()).await.unwrap();

        let events = f.publisher.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].product_id, created.id);
        assert!(f.cache.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_request() {
        let f = fixture();
        let request = CreateProductRequest {
            name: "".to_string(),
            price: -1.0,
            enabled: true,
        };

        let err = f.service.create_product(request).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(f.repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_notification_failure_reports_persisted_id() {
        let f = fixture_with(RecordingPublisher {
            fail: true,
            ..Default::default()
        });

        let err = f.service.create_product(widget()).await.unwrap_err();

        match err {
            CatalogError::Notification { product_id, .. } => {
                assert_eq!(product_id, 1);
                assert!(f.repo.stored(ProductId(product_id)).is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_missing_product_does_not_cache() {
        let f = fixture();

        let err = f.service.get_product(ProductId(404)).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(f.cache.is_empty());
    }

    #[tokio::test]
    async fn test_update_changes_only_present_fields_and_refreshes_cache() {
        let f = fixture();
        let created = f.service.create_product(widget()).await.unwrap();
        f.service.get_product(created.id).await.unwrap();

        let updated = f
            .service
            .update_product(
                created.id,
                UpdateProductRequest {
                    price: Some(42.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price, 42.0);
        assert_eq!(updated.name, "Widget");
        assert!(updated.enabled);
        assert_eq!(updated.created_at, created.created_at);

        // The refreshed entry is served without another store read.
        let reads = f.repo.find_calls();
        let fetched = f.service.get_product(created.id).await.unwrap();
        assert_eq!(fetched.price, 42.0);
        assert_eq!(f.repo.find_calls(), reads);
        assert!(f.cache.exists("product::1").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let f = fixture();

        let err = f
            .service
            .update_product(ProductId(9), UpdateProductRequest::default())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_rejects_blank_name() {
        let f = fixture();
        let created = f.service.create_product(widget()).await.unwrap();

        let err = f
            .service
            .update_product(
                created.id,
                UpdateProductRequest {
                    name: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(f.repo.stored(created.id).unwrap().name, "Widget");
    }

    #[tokio::test]
    async fn test_list_is_served_from_cache_until_mutation() {
        let f = fixture();
        let first = f.service.create_product(widget()).await.unwrap();
        let page = PageRequest::new(0, 10);

        let listed = f.service.list_products(page).await.unwrap();
        assert_eq!(listed.len(), 1);
        f.service.list_products(page).await.unwrap();
        assert_eq!(f.repo.list_calls(), 1);

        // Mutating a record on another page still clears every cached page.
        f.service.create_product(widget()).await.unwrap();
        f.service
            .update_product(
                first.id,
                UpdateProductRequest {
                    enabled: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!f.cache.exists("products::0:10").await.unwrap());

        let relisted = f.service.list_products(page).await.unwrap();
        assert_eq!(relisted.len(), 2);
        assert!(!relisted.content[0].enabled);
        assert_eq!(f.repo.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_delete_evicts_product_and_pages() {
        let f = fixture();
        let created = f.service.create_product(widget()).await.unwrap();
        f.service.get_product(created.id).await.unwrap();
        f.service.list_products(PageRequest::new(0, 10)).await.unwrap();
        assert_eq!(f.cache.len(), 2);

        f.service.delete_product(created.id).await.unwrap();

        assert!(f.cache.is_empty());
        assert!(f.service.get_product(created.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_unknown_product_still_clears_pages() {
        let f = fixture();
        f.service.list_products(PageRequest::new(0, 10)).await.unwrap();
        assert!(f.cache.exists("products::0:10").await.unwrap());

        f.service.delete_product(ProductId(77)).await.unwrap();

        assert!(!f.cache.exists("products::0:10").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_entry_falls_back_to_store() {
        let f = fixture();
        let created = f.service.create_product(widget()).await.unwrap();
        f.service.get_product(created.id).await.unwrap();

        f.cache.advance(PRODUCT_CACHE_TTL);

        f.service.get_product(created.id).await.unwrap();
        assert_eq!(f.repo.find_calls(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_replaced_from_store() {
        let f = fixture();
        let created = f.service.create_product(widget()).await.unwrap();
        f.cache
            .set_raw("product::1", "garbage", PRODUCT_CACHE_TTL)
            .await
            .unwrap();

        let fetched = f.service.get_product(created.id).await.unwrap();

        assert_eq!(fetched, created);
        let raw = f.cache.get_raw("product::1").await.unwrap().unwrap();
        assert!(raw.contains("\"createdAt\""));
    }
}

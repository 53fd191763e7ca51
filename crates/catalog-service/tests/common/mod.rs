//! Shared test doubles for service integration tests.

use async_trait::async_trait;
use catalog_core::{CatalogResult, NewProduct, Page, PageRequest, Product, ProductCreated, ProductId};
use catalog_repository::ProductRepository;
use catalog_service::{InMemoryCache, ProductCacheRepository, ProductEventPublisher, ProductServiceImpl};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory store that counts point reads per id.
#[derive(Default)]
pub struct CountingStore {
    products: Mutex<BTreeMap<i64, Product>>,
    reads: Mutex<BTreeMap<i64, usize>>,
    pages: AtomicUsize,
}

impl CountingStore {
    pub fn reads_of(&self, id: ProductId) -> usize {
        self.reads.lock().unwrap().get(&id.into_inner()).copied().unwrap_or(0)
    }

    pub fn page_reads(&self) -> usize {
        self.pages.load(Ordering::SeqCst)
    }

    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.products.lock().unwrap().get(&id.into_inner()).cloned()
    }
}

#[async_trait]
impl ProductRepository for CountingStore {
    async fn save(&self, product: &NewProduct) -> CatalogResult<Product> {
        let mut products = self.products.lock().unwrap();
        let id = products.keys().next_back().map_or(1, |last| last + 1);
        let saved = product.clone().with_id(ProductId(id));
        products.insert(id, saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        *self.reads.lock().unwrap().entry(id.into_inner()).or_default() += 1;
        Ok(self.get(id))
    }

    async fn find_all(&self, page: PageRequest) -> CatalogResult<Page<Product>> {
        self.pages.fetch_add(1, Ordering::SeqCst);
        let products = self.products.lock().unwrap();
        let content = products
            .values()
            .skip(page.offset())
            .take(page.limit())
            .cloned()
            .collect();
        Ok(Page::new(content, page.page, page.size, products.len() as u64))
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

/// Publisher that keeps every event it is given.
#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<ProductCreated>>,
}

#[async_trait]
impl ProductEventPublisher for RecordingPublisher {
    async fn publish_created(&self, event: &ProductCreated) -> CatalogResult<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// A wired service with handles on its collaborators.
pub struct TestContext {
    pub store: Arc<CountingStore>,
    pub cache: Arc<InMemoryCache>,
    pub product_cache: Arc<ProductCacheRepository>,
    pub publisher: Arc<RecordingPublisher>,
    pub service: ProductServiceImpl,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(CountingStore::default());
        let cache = Arc::new(InMemoryCache::new());
        let product_cache = Arc::new(ProductCacheRepository::new(cache.clone()));
        let publisher = Arc::new(RecordingPublisher::default());
        let service = ProductServiceImpl::new(store.clone(), product_cache.clone(), publisher.clone());

        Self {
            store,
            cache,
            product_cache,
            publisher,
            service,
        }
    }
}

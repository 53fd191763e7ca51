//! Repository trait definitions.

use catalog_core::{CatalogResult, Interface, NewProduct, Page, PageRequest, Product, ProductId};
use async_trait::async_trait;

/// Product store. The relational database behind it is the system of record.
#[async_trait]
pub trait ProductRepository: Interface + Send + Sync {
    /// Inserts a new product and returns it with the store-assigned id.
    async fn save(&self, product: &NewProduct) -> CatalogResult<Product>;

    /// Finds a product by ID.
    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>>;

    /// Finds all products with pagination, ordered by id.
    async fn find_all(&self, page: PageRequest) -> CatalogResult<Page<Product>>;

    /// Overwrites an existing product.
    ///
    /// Fails with `NotFound` if the row is gone.
    async fn update(&self, product: &Product) -> CatalogResult<Product>;

    /// Deletes a product by ID. Returns false if no row matched.
    async fn delete(&self, id: ProductId) -> CatalogResult<bool>;

    /// Counts all products.
    async fn count(&self) -> CatalogResult<u64>;
}

//! Product service trait definition.

use crate::dto::{CreateProductRequest, ProductResponse, UpdateProductRequest};
use async_trait::async_trait;
use catalog_core::{CatalogResult, Interface, Page, PageRequest, ProductId};

/// Product use cases.
#[async_trait]
pub trait ProductService: Interface + Send + Sync {
    /// Persists a new product and announces it.
    ///
    /// If the product is stored but the announcement fails, the error is
    /// `CatalogError::Notification` carrying the stored id.
    async fn create_product(&self, request: CreateProductRequest) -> CatalogResult<ProductResponse>;

    /// Gets a product by ID, reading through the cache.
    async fn get_product(&self, id: ProductId) -> CatalogResult<ProductResponse>;

    /// Lists products with pagination, reading through the cache.
    async fn list_products(&self, page: PageRequest) -> CatalogResult<Page<ProductResponse>>;

    /// Applies a partial update.
    async fn update_product(&self, id: ProductId, request: UpdateProductRequest) -> CatalogResult<ProductResponse>;

    /// Deletes a product. Deleting an unknown id succeeds.
    async fn delete_product(&self, id: ProductId) -> CatalogResult<()>;
}

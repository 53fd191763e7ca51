//! MySQL product repository implementation.

use crate::{traits::ProductRepository, DatabasePoolInterface};
use async_trait::async_trait;
use catalog_core::{CatalogError, CatalogResult, NewProduct, Page, PageRequest, Product, ProductId};
use chrono::{DateTime, Utc};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// MySQL product repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = ProductRepository)]
pub struct MySqlProductRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlProductRepository {
    /// Creates a new MySQL product repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// `LIMIT` and `OFFSET` bind values for a page request.
///
/// Offsets past `i64::MAX` are pinned there; MySQL then returns no rows.
fn limit_offset(page: PageRequest) -> (i64, i64) {
    let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    (limit, offset)
}

/// Database row representation of a product.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: f64,
    enabled: bool,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId(row.id),
            name: row.name,
            price: row.price,
            enabled: row.enabled,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn save(&self, product: &NewProduct) -> CatalogResult<Product> {
        debug!("Saving new product: {}", product.name);

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, price, enabled, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(product.enabled)
        .bind(product.created_at)
        .execute(self.pool.inner())
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| CatalogError::internal("Inserted product id out of range"))?;

        Ok(product.clone().with_id(ProductId(id)))
    }

    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        debug!("Finding product by id: {}", id);

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, price, enabled, created_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Product::from))
    }

    async fn find_all(&self, page: PageRequest) -> CatalogResult<Page<Product>> {
        debug!("Finding all products, page: {}, size: {}", page.page, page.size);

        let total = self.count().await?;
        let (limit, offset) = limit_offset(page);

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, price, enabled, created_at
            FROM products
            ORDER BY id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.inner())
        .await?;

        let products = rows.into_iter().map(Product::from).collect();
        Ok(Page::new(products, page.page, page.size, total))
    }

    async fn update(&self, product: &Product) -> CatalogResult<Product> {
        debug!("Updating product: {}", product.id);

        sqlx::query(
            r#"
            UPDATE products
            SET name = ?, price = ?, enabled = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(product.enabled)
        .bind(product.id.into_inner())
        .execute(self.pool.inner())
        .await?;

        // MySQL reports changed rows rather than matched rows, so re-read.
        self.find_by_id(product.id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", product.id))
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
        debug!("Deleting product: {}", id);

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> CatalogResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool.inner())
            .await?;

        Ok(u64::try_from(total).unwrap_or_default())
    }
}

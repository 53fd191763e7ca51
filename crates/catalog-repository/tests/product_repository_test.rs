//! Integration tests for MySqlProductRepository.
//!
//! These tests run against a real MySQL database using testcontainers and
//! are ignored unless Docker is available (`cargo test -- --ignored`).

mod common;

use catalog_core::{CatalogError, NewProduct, PageRequest, ProductId};
use catalog_repository::{MySqlProductRepository, ProductRepository};
use common::TestDatabase;

fn new_product(name: &str, price: f64) -> NewProduct {
    NewProduct::new(name.to_string(), price, true)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_save_assigns_id_and_find_by_id() {
    let db = TestDatabase::new().await;
    let repo = MySqlProductRepository::new(db.pool());

    let saved = repo.save(&new_product("Widget", 9.99)).await.expect("Failed to save");
    assert!(saved.id.into_inner() > 0);

    let found = repo
        .find_by_id(saved.id)
        .await
        .expect("Query failed")
        .expect("Product not found");

    assert_eq!(found, saved);
    assert_eq!(found.name, "Widget");
    assert_eq!(found.price, 9.99);
    assert!(found.enabled);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_by_id_not_found() {
    let db = TestDatabase::new().await;
    let repo = MySqlProductRepository::new(db.pool());

    let result = repo.find_by_id(ProductId(404)).await.expect("Query failed");
    assert!(result.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_all_orders_by_id_and_paginates() {
    let db = TestDatabase::new().await;
    let repo = MySqlProductRepository::new(db.pool());

    for (name, price) in [("a", 1.0), ("b", 2.0), ("c", 3.0)] {
        repo.save(&new_product(name, price)).await.expect("Failed to save");
    }

    let first = repo.find_all(PageRequest::new(0, 2)).await.expect("Query failed");
    assert_eq!(first.total_elements(), 3);
    assert_eq!(first.total_pages(), 2);
    let names: Vec<_> = first.content.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);

    let second = repo.find_all(PageRequest::new(1, 2)).await.expect("Query failed");
    assert_eq!(second.len(), 1);
    assert_eq!(second.content[0].name, "c");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_overwrites_mutable_fields() {
    let db = TestDatabase::new().await;
    let repo = MySqlProductRepository::new(db.pool());

    let mut product = repo.save(&new_product("Widget", 9.99)).await.expect("Failed to save");
    product.reprice(42.0);
    product.set_enabled(false);

    let updated = repo.update(&product).await.expect("Failed to update");
    assert_eq!(updated.price, 42.0);
    assert!(!updated.enabled);
    assert_eq!(updated.name, "Widget");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_missing_row_is_not_found() {
    let db = TestDatabase::new().await;
    let repo = MySqlProductRepository::new(db.pool());

    let ghost = new_product("Ghost", 1.0).with_id(ProductId(999));
    let err = repo.update(&ghost).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_and_count() {
    let db = TestDatabase::new().await;
    let repo = MySqlProductRepository::new(db.pool());

    let product = repo.save(&new_product("Widget", 9.99)).await.expect("Failed to save");
    assert_eq!(repo.count().await.unwrap(), 1);

    assert!(repo.delete(product.id).await.unwrap());
    assert!(!repo.delete(product.id).await.unwrap());
    assert_eq!(repo.count().await.unwrap(), 0);
}

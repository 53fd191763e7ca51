//! Entity-DTO mappers.

use crate::dto::{ProductResponse, UpdateProductRequest};
use catalog_core::{Page, Product};

/// Applies the present fields of an update request to a product.
pub fn apply_update(product: &mut Product, request: UpdateProductRequest) {
    if let Some(name) = request.name {
        product.rename(name);
    }
    if let Some(price) = request.price {
        product.reprice(price);
    }
    if let Some(enabled) = request.enabled {
        product.set_enabled(enabled);
    }
}

/// Converts a page of products to a page of responses.
#[must_use]
pub fn to_response_page(page: Page<Product>) -> Page<ProductResponse> {
    page.map(ProductResponse::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{NewProduct, ProductId};

    fn widget() -> Product {
        NewProduct::new("Widget".to_string(), 9.99, true).with_id(ProductId(1))
    }

    #[test]
    fn test_apply_update_only_touches_present_fields() {
        let mut product = widget();
        apply_update(
            &mut product,
            UpdateProductRequest {
                price: Some(42.0),
                ..Default::default()
            },
        );

        assert_eq!(product.price, 42.0);
        assert_eq!(product.name, "Widget");
        assert!(product.enabled);
    }

    #[test]
    fn test_apply_update_can_disable() {
        let mut product = widget();
        apply_update(
            &mut product,
            UpdateProductRequest {
                enabled: Some(false),
                ..Default::default()
            },
        );
        assert!(!product.enabled);
        assert_eq!(product.price, 9.99);
    }

    #[test]
    fn test_to_response_page_keeps_paging_info() {
        let page = Page::new(vec![widget()], 0, 10, 11);
        let mapped = to_response_page(page);

        assert_eq!(mapped.content[0].id, ProductId(1));
        assert_eq!(mapped.total_elements(), 11);
        assert_eq!(mapped.total_pages(), 2);
    }
}

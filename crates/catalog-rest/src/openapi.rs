//! OpenAPI documentation configuration.

use crate::controllers::{DependencyStatus, HealthResponse, ReadinessResponse};
use catalog_core::{ErrorResponse, FieldError, PageInfo, ProductId};
use catalog_service::{CreateProductRequest, ProductResponse, UpdateProductRequest};
use utoipa::OpenApi;

/// OpenAPI documentation for the catalog API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "1.0.0",
        description = "Product catalog with a read-through cache"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        crate::controllers::product_controller::list_products,
        crate::controllers::product_controller::create_product,
        crate::controllers::product_controller::get_product,
        crate::controllers::product_controller::update_product,
        crate::controllers::product_controller::delete_product,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            ProductId,
            PageInfo,
            ErrorResponse,
            FieldError,
            CreateProductRequest,
            UpdateProductRequest,
            ProductResponse,
            HealthResponse,
            ReadinessResponse,
            DependencyStatus,
        )
    ),
    tags(
        (name = "products", description = "Product management"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_product_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/products"));
        assert!(paths.iter().any(|p| p.as_str() == "/products/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/ready"));
    }
}

//! Product management controller.

use crate::{
    extractors::{PaginationQuery, ValidatedJson},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use catalog_core::{CatalogError, Page, ProductId};
use catalog_service::{CreateProductRequest, ProductResponse, UpdateProductRequest};
use tracing::debug;

/// Creates the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).patch(update_product).delete(delete_product),
        )
}

/// List products, one page at a time.
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    params(PaginationQuery),
    responses(
        (status = 200, description = "A page of products", body = Page<ProductResponse>),
        (status = 500, description = "Store or cache failure", body = catalog_core::ErrorResponse)
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<Page<ProductResponse>> {
    debug!("List products request: {:?}", pagination);

    let response = state.product_service.list_products(pagination.into()).await?;
    ok(response)
}

/// Create a new product.
#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid request", body = catalog_core::ErrorResponse),
        (status = 500, description = "Store failure, or stored but not announced", body = catalog_core::ErrorResponse)
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductResponse>>), AppError> {
    debug!("Create product request: {}", request.name);

    let response = state.product_service.create_product(request).await?;
    Ok(created(response))
}

/// Get a product by ID.
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 400, description = "Malformed id", body = catalog_core::ErrorResponse),
        (status = 404, description = "No such product", body = catalog_core::ErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ProductResponse> {
    debug!("Get product request: {}", id);

    let product_id = parse_product_id(&id)?;
    let response = state.product_service.get_product(product_id).await?;
    ok(response)
}

/// Partially update a product. Absent fields keep their value.
#[utoipa::path(
    patch,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "The updated product", body = ProductResponse),
        (status = 400, description = "Invalid request", body = catalog_core::ErrorResponse),
        (status = 404, description = "No such product", body = catalog_core::ErrorResponse)
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateProductRequest>,
) -> ApiResult<ProductResponse> {
    debug!("Update product request: {}", id);

    let product_id = parse_product_id(&id)?;
    let response = state
        .product_service
        .update_product(product_id, request)
        .await?;
    ok(response)
}

/// Delete a product. Deleting an unknown id also answers 204.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, description = "Malformed id", body = catalog_core::ErrorResponse)
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete product request: {}", id);

    let product_id = parse_product_id(&id)?;
    state.product_service.delete_product(product_id).await?;
    Ok(no_content())
}

/// Parses a product ID from a path segment.
fn parse_product_id(id: &str) -> Result<ProductId, AppError> {
    id.parse::<i64>()
        .map(ProductId)
        .map_err(|_| AppError(CatalogError::validation(format!("Invalid product ID: {id}"))))
}

//! Shared fixtures for router tests.

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use catalog_config::ServerConfig;
use catalog_core::{
    CatalogError, CatalogResult, HealthCheck, HealthStatus, NewProduct, Page, PageRequest, ProductId,
};
use catalog_rest::{create_router, AppState};
use catalog_service::{
    mappers::apply_update, CreateProductRequest, ProductResponse, ProductService, UpdateProductRequest,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Product service backed by a map.
#[derive(Default)]
pub struct StubProductService {
    products: Mutex<BTreeMap<i64, ProductResponse>>,
    fail_notifications: bool,
}

impl StubProductService {
    /// A service that stores products but fails to announce them.
    pub fn failing_notifications() -> Self {
        Self {
            fail_notifications: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ProductService for StubProductService {
    async fn create_product(&self, request: CreateProductRequest) -> CatalogResult<ProductResponse> {
        let mut products = self.products.lock().unwrap();
        let id = products.keys().next_back().map_or(1, |last| last + 1);
        let product = NewProduct::new(request.name, request.price, request.enabled).with_id(ProductId(id));
        products.insert(id, product.clone().into());

        if self.fail_notifications {
            return Err(CatalogError::Notification {
                product_id: id,
                message: "channel unavailable".to_string(),
            });
        }
        Ok(product.into())
    }

    async fn get_product(&self, id: ProductId) -> CatalogResult<ProductResponse> {
        self.products
            .lock()
            .unwrap()
            .get(&id.into_inner())
            .cloned()
            .ok_or_else(|| CatalogError::not_found("Product", id))
    }

    async fn list_products(&self, page: PageRequest) -> CatalogResult<Page<ProductResponse>> {
        let products = self.products.lock().unwrap();
        let content = products
            .values()
            .skip(page.offset())
            .take(page.limit())
            .cloned()
            .collect();
        Ok(Page::new(content, page.page, page.size, products.len() as u64))
    }

    async fn update_product(&self, id: ProductId, request: UpdateProductRequest) -> CatalogResult<ProductResponse> {
        let mut products = self.products.lock().unwrap();
        let current = products
            .get(&id.into_inner())
            .ok_or_else(|| CatalogError::not_found("Product", id))?;

        let mut product = NewProduct::new(current.name.clone(), current.price, current.enabled).with_id(id);
        product.created_at = current.created_at;
        apply_update(&mut product, request);

        let response = ProductResponse::from(product);
        products.insert(id.into_inner(), response.clone());
        Ok(response)
    }

    async fn delete_product(&self, id: ProductId) -> CatalogResult<()> {
        self.products.lock().unwrap().remove(&id.into_inner());
        Ok(())
    }
}

/// Health check with a fixed answer.
pub struct FixedHealth(pub &'static str, pub HealthStatus);

#[async_trait]
impl HealthCheck for FixedHealth {
    fn name(&self) -> &str {
        self.0
    }

    async fn check(&self) -> HealthStatus {
        self.1.clone()
    }
}

pub fn app_with(service: StubProductService, checks: Vec<Arc<dyn HealthCheck>>) -> Router {
    let state = checks
        .into_iter()
        .fold(AppState::new(Arc::new(service)), AppState::with_health_check);
    create_router(state, &ServerConfig::default())
}

pub fn app() -> Router {
    app_with(StubProductService::default(), Vec::new())
}

/// Sends a request and returns the status and the decoded JSON body, if any.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (u16, Option<Value>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let json = if bytes.is_empty() {
        None
    } else {
        serde_json::from_slice(&bytes).ok()
    };
    (status, json)
}

//! # Catalog Server
//!
//! Entry point for the catalog service: loads configuration, opens the
//! MySQL and Redis pools, wires the Shaku module, serves the REST API and
//! runs the created-event listener until shutdown.

use catalog_config::{AppConfig, ConfigLoader};
use catalog_core::{CatalogError, CatalogResult};
use catalog_repository::{create_pool, DatabasePoolInterface};
use catalog_rest::{create_router, AppState};
use catalog_server::di::{build_catalog_module, health_checks, ServiceResolver};
use catalog_server::startup::{init_logging, print_banner, print_startup_info, shutdown_signal};
use catalog_service::{create_redis_pool, ProductEventListener};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.get().await,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);
    print_banner();

    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> CatalogResult<()> {
    let db_pool = create_pool(&config.database).await?;
    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }

    let redis_pool = if config.redis.enabled {
        Some(create_redis_pool(&config.redis)?)
    } else {
        warn!("Redis is disabled; every read goes to the database");
        None
    };

    let module = build_catalog_module(&config, db_pool.inner().clone(), redis_pool.clone());

    let state = health_checks(db_pool.inner().clone(), redis_pool.clone())
        .into_iter()
        .fold(AppState::from_module(module.as_ref()), AppState::with_health_check);
    let router = create_router(state, &config.server);

    // Flipped to true on shutdown; dropping the sender also stops listeners.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let listener_task = spawn_event_listener(&config, shutdown_rx)?;

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CatalogError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    print_startup_info(&config.server);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| CatalogError::Internal(format!("REST server error: {}", e)))?;

    if let Some(task) = listener_task {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Product event listener stopped with error: {}", e),
            Err(e) => warn!("Product event listener task failed: {}", e),
        }
    }

    module.database_pool().close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Starts the created-event listener when messaging, the listener and Redis are all enabled.
fn spawn_event_listener(
    config: &AppConfig,
    mut shutdown: watch::Receiver<bool>,
) -> CatalogResult<Option<JoinHandle<CatalogResult<()>>>> {
    let messaging = &config.messaging;
    if !(messaging.enabled && messaging.listener_enabled && config.redis.enabled) {
        info!("Product event listener not started");
        return Ok(None);
    }

    let listener = ProductEventListener::new(&config.redis.url, messaging.product_created_channel.clone())?;
    let stop = async move {
        let _ = shutdown.wait_for(|stopped| *stopped).await;
    };

    Ok(Some(tokio::spawn(listener.run(stop))))
}

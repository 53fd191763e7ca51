//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use catalog_core::CatalogError;
use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Environment variable selecting the `config/{environment}.toml` overlay.
pub const ENVIRONMENT_VAR: &str = "CATALOG_ENVIRONMENT";

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `CATALOG__` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, CatalogError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, CatalogError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), CatalogError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    fn load_config(config_dir: &str) -> Result<AppConfig, CatalogError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        info!("Loading configuration for environment: {}", environment);

        let app_config = Self::build(config_dir, &environment)?;

        ConfigValidator::validate(&app_config)
            .map_err(|errors| CatalogError::Configuration(format_validation_errors(&errors)))?;

        Ok(app_config)
    }

    /// Merges the file layers and environment variables into an [`AppConfig`].
    pub fn build(config_dir: &str, environment: &str) -> Result<AppConfig, CatalogError> {
        let mut builder = Config::builder();

        for name in ["default", environment, "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("CATALOG")
                .separator("__")
                .try_parsing(true),
        );

        let mut app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize::<AppConfig>)
            .map_err(config_error_to_catalog_error)?;

        app_config.app.environment = environment.to_string();
        Ok(app_config)
    }

    /// Gets a specific configuration value by key path.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

fn config_error_to_catalog_error(err: ConfigError) -> CatalogError {
    CatalogError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_file_layers_override_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "default.toml",
            "[database]\nurl = \"mysql://a@db/catalog\"\n[server]\nrequest_timeout_secs = 300\n",
        );
        write(dir.path(), "staging.toml", "[server]\nrequest_timeout_secs = 120\n");
        write(dir.path(), "local.toml", "[messaging]\nlistener_enabled = false\n");

        let config = ConfigLoader::build(dir.path().to_str().unwrap(), "staging").unwrap();

        assert_eq!(config.database.url, "mysql://a@db/catalog");
        assert_eq!(config.server.request_timeout_secs, 120);
        assert!(!config.messaging.listener_enabled);
        assert!(config.messaging.enabled);
        assert_eq!(config.app.environment, "staging");
    }

    #[test]
    fn test_environment_variables_override_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "default.toml", "[redis]\ntimeout_secs = 2\n");

        std::env::set_var("CATALOG__REDIS__TIMEOUT_SECS", "9");
        let config = ConfigLoader::build(dir.path().to_str().unwrap(), "development");
        std::env::remove_var("CATALOG__REDIS__TIMEOUT_SECS");

        assert_eq!(config.unwrap().redis.timeout_secs, 9);
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "default.toml", "[server]\nport = \"not a port\"\n");

        let err = ConfigLoader::build(dir.path().to_str().unwrap(), "development").unwrap_err();
        assert!(matches!(err, CatalogError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_get_value_by_path() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "default.toml", "[server]\nrequest_timeout_secs = 42\n");

        let loader = ConfigLoader::new(dir.path().to_str().unwrap()).unwrap();

        assert_eq!(loader.get_value::<u64>("server.request_timeout_secs").await, Some(42));
        assert_eq!(loader.get_value::<u64>("server.missing").await, None);
    }
}

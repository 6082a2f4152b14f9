//! Client configuration
//!
//! Values are resolved in this order, later sources winning:
//!
//! 1. **Defaults**
//! 2. **Config file** (`congreso.toml`), each section replacing the default one
//! 3. **Environment variables** (`CONGRESO_*`)
//!
//! # Example
//!
//! ```no_run
//! use congreso_core::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! config.validate()?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ```toml
//! [api]
//! base_url = "https://congreso.example.edu/api"
//! timeout_secs = 10
//!
//! [storage]
//! backend = "file"
//! dir = "/var/lib/congreso"
//!
//! [access]
//! route_matching = "segment"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

mod access;
mod api;
mod storage;

pub use crate::logging::LoggingConfig;
pub use access::AccessConfig;
pub use api::ApiConfig;
pub use storage::{StorageBackend, StorageConfig};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "congreso.toml";

/// Complete client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Sections present in a config file; absent ones leave the current value alone
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api: Option<ApiConfig>,
    storage: Option<StorageConfig>,
    access: Option<AccessConfig>,
    logging: Option<LoggingConfig>,
}

impl AppConfig {
    /// Defaults, then `congreso.toml` if present, then environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::default();

        if path.exists() {
            let file = Self::read_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.apply_file(file);
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
        }

        config.apply_env_vars();
        Ok(config)
    }

    /// Parse a TOML file on its own, without environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::default();
        config.apply_file(Self::read_file(path.as_ref())?);
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<FileConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(api) = file.api {
            self.api.merge(api);
        }
        if let Some(storage) = file.storage {
            self.storage.merge(storage);
        }
        if let Some(access) = file.access {
            self.access.merge(access);
        }
        if let Some(logging) = file.logging {
            self.logging.merge(logging);
        }
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.api.merge(other.api);
        self.storage.merge(other.storage);
        self.access.merge(other.access);
        self.logging.merge(other.logging);
    }

    pub fn apply_env_vars(&mut self) {
        self.api.apply_env_vars();
        self.storage.apply_env_vars();
        self.access.apply_env_vars();
        self.logging.apply_env_vars();
    }

    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.storage.validate()?;
        self.access.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogFormat, LogLevel};
    use crate::rbac::RouteMatching;
    use std::sync::Mutex;

    // Environment variables are process-wide
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 8] = [
        "CONGRESO_API_URL",
        "CONGRESO_API_TIMEOUT_SECS",
        "CONGRESO_STORAGE_BACKEND",
        "CONGRESO_STORAGE_DIR",
        "CONGRESO_STORAGE_NAMESPACE",
        "CONGRESO_ROUTE_MATCHING",
        "CONGRESO_LOG_LEVEL",
        "CONGRESO_LOG_FORMAT",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:3000/api");
        assert_eq!(config.api.validate_path, "/validate-token");
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.token_key, "token");
        assert_eq!(config.storage.user_key, "usuario");
        assert_eq!(config.access.route_matching, RouteMatching::Segment);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_sections_replace_defaults() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("congreso.toml");
        std::fs::write(
            &path,
            r#"
            [api]
            base_url = "https://congreso.example.edu/api"

            [access]
            route_matching = "prefix"
            "#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();

        assert_eq!(config.api.base_url, "https://congreso.example.edu/api");
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.access.route_matching, RouteMatching::Prefix);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[api\nbase_url = 1").unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse TOML config"));
    }

    #[test]
    fn test_env_overrides_file() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("congreso.toml");
        std::fs::write(&path, "[api]\nbase_url = \"https://file.example\"\n").unwrap();

        std::env::set_var("CONGRESO_API_URL", "https://env.example");
        std::env::set_var("CONGRESO_API_TIMEOUT_SECS", "30");
        std::env::set_var("CONGRESO_STORAGE_BACKEND", "memory");
        std::env::set_var("CONGRESO_STORAGE_NAMESPACE", "pruebas");
        std::env::set_var("CONGRESO_ROUTE_MATCHING", "prefix");
        std::env::set_var("CONGRESO_LOG_LEVEL", "debug");
        std::env::set_var("CONGRESO_LOG_FORMAT", "logfmt");

        let config = AppConfig::load_from(&path);
        clear_env();
        let config = config.unwrap();

        assert_eq!(config.api.base_url, "https://env.example");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.namespace, "pruebas");
        assert_eq!(config.access.route_matching, RouteMatching::Prefix);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Logfmt);
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        std::env::set_var("CONGRESO_API_TIMEOUT_SECS", "soon");
        std::env::set_var("CONGRESO_ROUTE_MATCHING", "fuzzy");

        let mut config = AppConfig::default();
        config.apply_env_vars();
        clear_env();

        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.access.route_matching, RouteMatching::Segment);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = AppConfig::default();
        config.api.base_url = "localhost:3000".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.storage.namespace = "../escape".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.storage.user_key = "token".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut config = AppConfig::default();
        let mut other = AppConfig::default();
        other.storage.backend = StorageBackend::Memory;
        other.api.timeout_secs = 3;

        config.merge(other);

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.api.timeout_secs, 3);
    }
}

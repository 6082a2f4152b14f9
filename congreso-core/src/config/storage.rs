//! Session storage configuration

use crate::session::{DEFAULT_TOKEN_KEY, DEFAULT_USER_KEY};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per namespace
    #[default]
    File,
    /// Lost when the process exits
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("Invalid storage backend: {}", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Env: CONGRESO_STORAGE_BACKEND
    /// Default: file
    pub backend: StorageBackend,

    /// Env: CONGRESO_STORAGE_DIR
    /// Default: "./data"
    pub dir: PathBuf,

    /// Env: CONGRESO_STORAGE_NAMESPACE
    /// Default: "congreso"
    pub namespace: String,

    pub token_key: String,
    pub user_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            dir: PathBuf::from("./data"),
            namespace: "congreso".to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            user_key: DEFAULT_USER_KEY.to_string(),
        }
    }
}

impl StorageConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(backend) = env::var("CONGRESO_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(backend) => self.backend = backend,
                Err(e) => log::warn!("Ignoring CONGRESO_STORAGE_BACKEND: {}", e),
            }
        }
        if let Ok(dir) = env::var("CONGRESO_STORAGE_DIR") {
            self.dir = PathBuf::from(dir);
        }
        if let Ok(namespace) = env::var("CONGRESO_STORAGE_NAMESPACE") {
            self.namespace = namespace;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let valid_namespace = !self.namespace.is_empty()
            && self.namespace.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid_namespace {
            bail!("Invalid storage.namespace: use letters, digits, '-' or '_'");
        }

        if self.token_key.is_empty() || self.user_key.is_empty() {
            bail!("Invalid storage keys: must not be empty");
        }

        if self.token_key == self.user_key {
            bail!("Invalid storage keys: token_key and user_key must differ");
        }

        Ok(())
    }
}

//! Identity endpoint configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    /// Env: CONGRESO_API_URL
    /// Default: "http://localhost:3000/api"
    pub base_url: String,

    /// Per-request timeout in seconds
    /// Env: CONGRESO_API_TIMEOUT_SECS
    /// Default: 15
    pub timeout_secs: u64,

    pub login_path: String,
    pub register_path: String,
    pub validate_path: String,
    pub roles_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout_secs: 15,
            login_path: "/login".to_string(),
            register_path: "/register".to_string(),
            validate_path: "/validate-token".to_string(),
            roles_path: "/roles".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(url) = env::var("CONGRESO_API_URL") {
            self.base_url = url;
        }

        if let Ok(timeout) = env::var("CONGRESO_API_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => log::warn!("Ignoring CONGRESO_API_TIMEOUT_SECS={}: not a number", timeout),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            bail!("Invalid api.base_url: must start with http:// or https://");
        }

        if self.timeout_secs == 0 {
            bail!("Invalid api.timeout_secs: must be greater than 0");
        }

        for (name, path) in [
            ("login_path", &self.login_path),
            ("register_path", &self.register_path),
            ("validate_path", &self.validate_path),
            ("roles_path", &self.roles_path),
        ] {
            if path.trim().is_empty() {
                bail!("Invalid api.{}: must not be empty", name);
            }
        }

        Ok(())
    }
}

//! Access control configuration

use crate::rbac::RouteMatching;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Env: CONGRESO_ROUTE_MATCHING ("segment" or "prefix")
    /// Default: segment
    pub route_matching: RouteMatching,
}

impl AccessConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(mode) = env::var("CONGRESO_ROUTE_MATCHING") {
            match mode.parse() {
                Ok(mode) => self.route_matching = mode,
                Err(e) => log::warn!("Ignoring CONGRESO_ROUTE_MATCHING: {}", e),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.route_matching == RouteMatching::Prefix {
            log::warn!("Prefix route matching is enabled; '/admin' will also cover '/administrator'");
        }
        Ok(())
    }
}

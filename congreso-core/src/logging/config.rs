//! Logger settings

use super::LogFormat;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::str::FromStr;

/// Severity threshold, compatible with the `log` crate levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Trace => LogLevel::Trace,
        }
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => bail!("Invalid log level: {}", other),
        }
    }
}

/// Stream the logger writes to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    #[default]
    Stderr,
    Stdout,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Env: CONGRESO_LOG_LEVEL
    pub level: LogLevel,
    /// Env: CONGRESO_LOG_FORMAT
    pub format: LogFormat,
    pub target: LogTarget,
    /// Fields attached to every entry
    pub context_fields: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Human,
            target: LogTarget::Stderr,
            context_fields: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    pub fn production() -> Self {
        Self { format: LogFormat::Json, ..Self::default() }
    }

    pub fn development() -> Self {
        Self { level: LogLevel::Debug, ..Self::default() }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_context_field(mut self, key: &str, value: &str) -> Self {
        self.context_fields.insert(key.to_string(), value.to_string());
        self
    }

    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(level) = env::var("CONGRESO_LOG_LEVEL") {
            match level.parse() {
                Ok(level) => self.level = level,
                Err(e) => log::warn!("Ignoring CONGRESO_LOG_LEVEL: {}", e),
            }
        }

        if let Ok(format) = env::var("CONGRESO_LOG_FORMAT") {
            match format.parse() {
                Ok(format) => self.format = format,
                Err(e) => log::warn!("Ignoring CONGRESO_LOG_FORMAT: {}", e),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.context_fields.keys().any(|key| key.trim().is_empty()) {
            bail!("Invalid logging context field: empty key");
        }
        Ok(())
    }
}

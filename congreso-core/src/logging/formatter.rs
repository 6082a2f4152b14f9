//! Log line rendering

use super::LogLevel;
use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Output style of a log line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `{"timestamp":"...","level":"INFO","target":"...","message":"..."}`
    Json,
    /// `2026-01-15 10:30:00.000 INFO  [congreso_core::auth] Session restored`
    Human,
    /// `timestamp=... level=INFO target=... message="..."`
    Logfmt,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "human" | "text" => Ok(LogFormat::Human),
            "logfmt" => Ok(LogFormat::Logfmt),
            other => bail!("Invalid log format: {}", other),
        }
    }
}

/// One record ready to render
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
    pub fields: BTreeMap<String, Value>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            target: target.into(),
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn from_record(record: &log::Record, context: &BTreeMap<String, String>) -> Self {
        let mut entry =
            Self::new(record.level().into(), record.args().to_string(), record.target());
        for (key, value) in context {
            entry.fields.insert(key.clone(), Value::String(value.clone()));
        }
        entry
    }

    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    fn level_name(&self) -> String {
        format!("{:?}", self.level).to_uppercase()
    }
}

impl LogFormat {
    pub fn render(self, entry: &LogEntry) -> String {
        match self {
            LogFormat::Json => render_json(entry),
            LogFormat::Human => render_human(entry),
            LogFormat::Logfmt => render_logfmt(entry),
        }
    }
}

fn render_json(entry: &LogEntry) -> String {
    let mut object = serde_json::Map::new();
    object.insert("timestamp".to_string(), Value::String(entry.timestamp.to_rfc3339()));
    object.insert("level".to_string(), Value::String(entry.level_name()));
    object.insert("target".to_string(), Value::String(entry.target.clone()));
    object.insert("message".to_string(), Value::String(entry.message.clone()));
    for (key, value) in &entry.fields {
        object.entry(key.clone()).or_insert_with(|| value.clone());
    }
    Value::Object(object).to_string()
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

fn render_human(entry: &LogEntry) -> String {
    let mut line = format!(
        "{} {:5} [{}] {}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
        entry.level_name(),
        entry.target,
        entry.message
    );
    for (key, value) in &entry.fields {
        line.push_str(&format!(" {}={}", key, plain(value)));
    }
    line
}

fn render_logfmt(entry: &LogEntry) -> String {
    let mut parts = vec![
        format!("timestamp={}", entry.timestamp.to_rfc3339()),
        format!("level={}", entry.level_name()),
        format!("target={}", entry.target),
        format!("message={}", quoted(&entry.message)),
    ];
    for (key, value) in &entry.fields {
        let rendered = match value {
            Value::Number(_) | Value::Bool(_) => value.to_string(),
            other => quoted(&plain(other)),
        };
        parts.push(format!("{}={}", key, rendered));
    }
    parts.join(" ")
}

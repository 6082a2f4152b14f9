//! Structured logging on top of the `log` facade
//!
//! Library code logs with the standard macros (`log::info!`, `log::warn!`
//! and friends). Applications that want this crate's formatting install
//! the logger once at startup:
//!
//! ```rust,no_run
//! use congreso_core::logging::{init_logging, LoggingConfig};
//!
//! let config = LoggingConfig::production().with_context_field("service", "congreso");
//! init_logging(&config).unwrap();
//!
//! log::info!("Client starting");
//! ```
//!
//! Tokens and passwords never reach the log.

mod config;
mod formatter;

pub use config::{LogLevel, LogTarget, LoggingConfig};
pub use formatter::{LogEntry, LogFormat};

use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Install the global logger
///
/// Only the first call has an effect. Fails if another logger was
/// installed by someone else first.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = install(config);
    });
    result
}

fn install(config: &LoggingConfig) -> anyhow::Result<()> {
    log::set_boxed_logger(Box::new(CongresoLogger::new(config.clone())))?;
    log::set_max_level(config.level.into());
    Ok(())
}

struct CongresoLogger {
    config: LoggingConfig,
}

impl CongresoLogger {
    fn new(config: LoggingConfig) -> Self {
        Self { config }
    }

    fn write_line(&self, line: &str) {
        // A logger has nowhere to report its own write failures
        let _ = match self.config.target {
            LogTarget::Stderr => writeln!(std::io::stderr().lock(), "{}", line),
            LogTarget::Stdout => writeln!(std::io::stdout().lock(), "{}", line),
        };
    }
}

impl log::Log for CongresoLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        LogLevel::from(metadata.level()) <= self.config.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = LogEntry::from_record(record, &self.config.context_fields);
        self.write_line(&self.config.format.render(&entry));
    }

    fn flush(&self) {
        let _ = match self.config.target {
            LogTarget::Stderr => std::io::stderr().flush(),
            LogTarget::Stdout => std::io::stdout().flush(),
        };
    }
}

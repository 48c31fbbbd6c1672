//! Logging initialisation.
//!
//! Library code logs through the `log` facade and opens `tracing` spans.
//! [`init_logging`] installs one global `tracing-subscriber` registry and
//! bridges `log` records into it.

use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingConfig;

static INITIALIZED: Mutex<bool> = Mutex::new(false);

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to bridge log records: {0}")]
    LogBridge(String),

    #[error("Failed to install global subscriber: {0}")]
    Subscriber(String),
}

/// Parses `EnvFilter` directives such as `info,cleartrack=debug`.
pub fn parse_filter(directives: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directives).map_err(|e| TelemetryError::InvalidFilter {
        filter: directives.to_string(),
        reason: e.to_string(),
    })
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
///
/// Returns `Ok(false)` when logging was already initialised by an earlier call.
pub fn init_logging(config: &LoggingConfig) -> Result<bool, TelemetryError> {
    let mut initialized = INITIALIZED.lock().unwrap_or_else(|e| e.into_inner());
    if *initialized {
        return Ok(false);
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(&config.filter)?,
    };

    let fmt_layer = if config.json {
        fmt::layer().json().with_current_span(true).boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    let subscriber = tracing_subscriber::registry().with(fmt_layer).with(filter);

    tracing_log::LogTracer::init().map_err(|e| TelemetryError::LogBridge(e.to_string()))?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| TelemetryError::Subscriber(e.to_string()))?;

    *initialized = true;
    log::debug!(
        "Logging initialised (filter: {}, json: {})",
        config.filter,
        config.json
    );
    Ok(true)
}

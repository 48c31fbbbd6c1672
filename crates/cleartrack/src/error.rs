use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleartrackError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] crate::telemetry::TelemetryError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid thresholds: {reason}")]
    InvalidThresholds { reason: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Container '{container_number}' not found on job '{job_no}'")]
    ContainerNotFound {
        job_no: String,
        container_number: String,
    },

    /// Failure reported by a non-SQLite backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Container '{container_number}' not found on job '{job_no}'")]
    ContainerNotFound {
        job_no: String,
        container_number: String,
    },
}

pub type Result<T> = std::result::Result<T, CleartrackError>;

pub mod config;
pub mod dates;
pub mod db;
pub mod deadline;
pub mod detention;
pub mod error;
pub mod record;
pub mod status;
pub mod store;
pub mod telemetry;
pub mod tracker;

pub use config::{load_config, Config, LoggingConfig};
pub use deadline::{BucketThresholds, DeadlineBucketer, Highlight, JobUrgency, Policy, UrgencyBucket};
pub use detention::{compute_detention_from, DetentionPlan, DetentionUpdate};
pub use error::{CleartrackError, ConfigError, Result, StoreError, TrackerError};
pub use record::{ContainerField, ContainerRow, JobField, JobRecord};
pub use status::{
    classify, BillOfEntryType, ConsignmentType, ContainerRecord, DetailedStatus, JobSnapshot,
    StatusClassifier,
};
pub use store::{JobStore, SqliteJobStore};
pub use telemetry::init_logging;
pub use tracker::{EditOutcome, MilestoneTracker, TrackerWarning};

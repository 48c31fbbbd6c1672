//! Milestone-edit orchestration.
//!
//! Every edit follows the same order: the milestone write (fatal on
//! failure), then the derived detention dates, then the derived status. The
//! derived writes are best effort: a failure is logged and reported as a
//! [`TrackerWarning`], and the milestone write stands.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info_span;

use crate::config::Config;
use crate::dates::{non_blank, parse_date};
use crate::deadline::{BucketThresholds, DeadlineBucketer, JobUrgency};
use crate::detention::{self, DetentionUpdate};
use crate::error::{ConfigError, TrackerError};
use crate::record::{ContainerField, JobField, JobRecord};
use crate::status::{DetailedStatus, StatusClassifier};
use crate::store::{JobStore, SqliteJobStore};

/// A derived write that did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TrackerWarning {
    StatusWriteFailed {
        status: DetailedStatus,
        error: String,
    },
    DetentionWriteFailed {
        containers: usize,
        error: String,
    },
}

impl fmt::Display for TrackerWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerWarning::StatusWriteFailed { status, error } => {
                write!(f, "Failed to persist status '{}': {}", status, error)
            }
            TrackerWarning::DetentionWriteFailed { containers, error } => write!(
                f,
                "Failed to persist detention dates for {} container(s): {}",
                containers, error
            ),
        }
    }
}

/// Result of one edit after re-derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    pub job_no: String,
    pub status: DetailedStatus,
    pub previous_status: Option<DetailedStatus>,
    /// Whether a changed status was written back.
    pub status_written: bool,
    pub detention_updates: Vec<DetentionUpdate>,
    pub warnings: Vec<TrackerWarning>,
}

impl EditOutcome {
    pub fn status_changed(&self) -> bool {
        self.previous_status != Some(self.status)
    }
}

pub struct MilestoneTracker<S: JobStore> {
    store: S,
    classifier: StatusClassifier,
    bucketer: DeadlineBucketer,
}

impl MilestoneTracker<SqliteJobStore> {
    /// Opens the configured SQLite store with the configured thresholds.
    pub fn open_from_config(config: &Config) -> crate::error::Result<Self> {
        let path = config
            .resolved_database_path()
            .ok_or_else(|| ConfigError::Validation {
                message: "No database_path configured and no home directory found".to_string(),
            })?;
        let store = SqliteJobStore::open(&path)?;
        Ok(Self::new(store, config.thresholds))
    }
}

impl<S: JobStore> MilestoneTracker<S> {
    pub fn new(store: S, thresholds: BucketThresholds) -> Self {
        Self {
            store,
            classifier: StatusClassifier::new(),
            bucketer: DeadlineBucketer::new(thresholds),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn bucketer(&self) -> &DeadlineBucketer {
        &self.bucketer
    }

    fn fetch(&self, job_no: &str) -> Result<JobRecord, TrackerError> {
        self.store
            .fetch_job(job_no)?
            .ok_or_else(|| TrackerError::JobNotFound(job_no.to_string()))
    }

    /// Edits a job-level milestone or flag. Blank values clear the field.
    pub fn set_job_field(
        &self,
        job_no: &str,
        field: JobField,
        value: Option<&str>,
    ) -> Result<EditOutcome, TrackerError> {
        let _span = info_span!("tracker.set_job_field", job_no = %job_no, field = ?field).entered();

        let mut record = self.fetch(job_no)?;
        let value = non_blank(value);
        self.store.patch_job_field(job_no, field, value)?;
        record.set_field(field, value.map(str::to_string));
        log::debug!("Job {}: {} set to {:?}", job_no, field.column(), value);

        Ok(self.rederive(&record, Vec::new(), Vec::new()))
    }

    /// Edits a container date. An arrival edit also moves that container's
    /// detention date.
    pub fn set_container_field(
        &self,
        job_no: &str,
        container_number: &str,
        field: ContainerField,
        value: Option<&str>,
    ) -> Result<EditOutcome, TrackerError> {
        let _span = info_span!(
            "tracker.set_container_field",
            job_no = %job_no,
            container = %container_number,
            field = ?field
        )
        .entered();

        let mut record = self.fetch(job_no)?;
        let free_time = record.free_time;
        let value = non_blank(value);

        let Some(row) = record.container_mut(container_number) else {
            return Err(TrackerError::ContainerNotFound {
                job_no: job_no.to_string(),
                container_number: container_number.to_string(),
            });
        };

        self.store
            .patch_container_field(job_no, container_number, field, value)?;
        row.set_field(field, value.map(str::to_string));

        let mut warnings = Vec::new();
        let mut detention_updates = Vec::new();
        if field == ContainerField::ArrivalDate {
            let update =
                detention::plan_arrival_change(container_number, parse_date(value), free_time);
            row.detention_from = update.persisted_value();
            let updates = vec![update];
            if let Some(warning) = self.write_detention(job_no, &updates) {
                warnings.push(warning);
            }
            detention_updates = updates;
        }

        Ok(self.rederive(&record, detention_updates, warnings))
    }

    /// Changes the job's free time and recomputes every container's
    /// detention date as one batch.
    pub fn set_free_time(
        &self,
        job_no: &str,
        free_time_days: u32,
    ) -> Result<EditOutcome, TrackerError> {
        let _span =
            info_span!("tracker.set_free_time", job_no = %job_no, days = free_time_days).entered();

        let mut record = self.fetch(job_no)?;
        self.store.patch_free_time(job_no, free_time_days)?;
        record.free_time = free_time_days;

        let snapshot = record.to_snapshot();
        let plan = detention::plan_free_time_change(&snapshot.containers, free_time_days);
        log::debug!(
            "Job {}: free time {} day(s), {} of {} detention date(s) move",
            job_no,
            free_time_days,
            plan.changed_count(&snapshot.containers),
            plan.updates.len()
        );

        let mut warnings = Vec::new();
        if !plan.updates.is_empty() {
            if let Some(warning) = self.write_detention(job_no, &plan.updates) {
                warnings.push(warning);
            }
            for update in &plan.updates {
                if let Some(row) = record.container_mut(&update.container_number) {
                    row.detention_from = update.persisted_value();
                }
            }
        }

        Ok(self.rederive(&record, plan.updates, warnings))
    }

    /// Re-derives the status without editing anything.
    pub fn refresh_status(&self, job_no: &str) -> Result<EditOutcome, TrackerError> {
        let _span = info_span!("tracker.refresh_status", job_no = %job_no).entered();
        let record = self.fetch(job_no)?;
        Ok(self.rederive(&record, Vec::new(), Vec::new()))
    }

    /// Deadline bucket of one job as of `today`.
    pub fn urgency(&self, job_no: &str, today: NaiveDate) -> Result<JobUrgency, TrackerError> {
        let record = self.fetch(job_no)?;
        Ok(self
            .bucketer
            .assess(&self.classifier, &record.to_snapshot(), today))
    }

    /// Every job's bucket, most severe first.
    pub fn triage(&self, today: NaiveDate) -> Result<Vec<JobUrgency>, TrackerError> {
        let _span = info_span!("tracker.triage", today = %today).entered();

        let mut snapshots = Vec::new();
        for job_no in self.store.list_job_numbers()? {
            match self.store.fetch_job(&job_no)? {
                Some(record) => snapshots.push(record.to_snapshot()),
                None => log::debug!("Job {} disappeared during triage", job_no),
            }
        }
        Ok(self.bucketer.triage(&self.classifier, &snapshots, today))
    }

    fn write_detention(&self, job_no: &str, updates: &[DetentionUpdate]) -> Option<TrackerWarning> {
        match self.store.patch_detention_dates(job_no, updates) {
            Ok(()) => None,
            Err(e) => {
                log::warn!(
                    "Job {}: failed to persist {} detention date(s): {}",
                    job_no,
                    updates.len(),
                    e
                );
                Some(TrackerWarning::DetentionWriteFailed {
                    containers: updates.len(),
                    error: e.to_string(),
                })
            }
        }
    }

    fn rederive(
        &self,
        record: &JobRecord,
        detention_updates: Vec<DetentionUpdate>,
        mut warnings: Vec<TrackerWarning>,
    ) -> EditOutcome {
        let snapshot = record.to_snapshot();
        let classification = self.classifier.evaluate(&snapshot);
        let status = classification.status;
        let previous_status = snapshot.current_status;

        let mut status_written = false;
        if previous_status != Some(status) {
            match self.store.patch_detailed_status(&record.job_no, status) {
                Ok(()) => {
                    status_written = true;
                    log::info!(
                        "Job {}: status {} -> {} (rule {})",
                        record.job_no,
                        previous_status.map_or("<none>", |s| s.as_str()),
                        status,
                        classification.rule_id.unwrap_or("fallback")
                    );
                }
                Err(e) => {
                    log::warn!(
                        "Job {}: failed to persist status '{}': {}",
                        record.job_no,
                        status,
                        e
                    );
                    warnings.push(TrackerWarning::StatusWriteFailed {
                        status,
                        error: e.to_string(),
                    });
                }
            }
        }

        EditOutcome {
            job_no: record.job_no.clone(),
            status,
            previous_status,
            status_written,
            detention_updates,
            warnings,
        }
    }
}

//! Job/container read-write interface used by the tracker.
//!
//! `SqliteJobStore` is the reference implementation over [`crate::db`]. Any
//! other backend (a REST client, an in-memory fake) plugs in through
//! [`JobStore`].

use std::path::Path;

use crate::db::{self, container_repo, job_repo, Database};
use crate::detention::DetentionUpdate;
use crate::error::StoreError;
use crate::record::{ContainerField, JobField, JobRecord};
use crate::status::DetailedStatus;

/// Reads and patches persisted jobs. Every patch is keyed by job number
/// (and container number) and overwrites the stored value.
pub trait JobStore {
    /// Fetches a job with its containers. `Ok(None)` for an unknown job.
    fn fetch_job(&self, job_no: &str) -> Result<Option<JobRecord>, StoreError>;

    /// All job numbers, in job-number order.
    fn list_job_numbers(&self) -> Result<Vec<String>, StoreError>;

    fn patch_detailed_status(&self, job_no: &str, status: DetailedStatus)
        -> Result<(), StoreError>;

    fn patch_job_field(
        &self,
        job_no: &str,
        field: JobField,
        value: Option<&str>,
    ) -> Result<(), StoreError>;

    fn patch_free_time(&self, job_no: &str, free_time_days: u32) -> Result<(), StoreError>;

    fn patch_container_field(
        &self,
        job_no: &str,
        container_number: &str,
        field: ContainerField,
        value: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Writes several containers' detention dates as one batch.
    fn patch_detention_dates(
        &self,
        job_no: &str,
        updates: &[DetentionUpdate],
    ) -> Result<(), StoreError>;
}

/// SQLite-backed job store.
#[derive(Clone)]
pub struct SqliteJobStore {
    db: Database,
}

impl SqliteJobStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Opens (or creates) the database file and runs migrations.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Inserts a job and its containers atomically, keeping container order.
    pub fn insert_job(&self, record: &JobRecord) -> Result<(), StoreError> {
        let row = job_repo::JobRow::from_record(record, &db::now_timestamp());
        self.db.with_transaction(|tx| {
            job_repo::insert_in(tx, &row)?;
            for (position, container) in record.container_nos.iter().enumerate() {
                container_repo::insert_in(tx, &record.job_no, position as u32, container)?;
            }
            Ok(())
        })?;
        log::debug!(
            "Inserted job {} with {} container(s)",
            record.job_no,
            record.container_nos.len()
        );
        Ok(())
    }

    fn require_job(&self, job_no: &str, found: bool) -> Result<(), StoreError> {
        if found {
            Ok(())
        } else {
            Err(StoreError::JobNotFound(job_no.to_string()))
        }
    }
}

impl JobStore for SqliteJobStore {
    fn fetch_job(&self, job_no: &str) -> Result<Option<JobRecord>, StoreError> {
        let Some(row) = job_repo::find_by_id(&self.db, job_no)? else {
            return Ok(None);
        };
        let containers = container_repo::list_by_job(&self.db, job_no)?;
        Ok(Some(row.into_record(containers)))
    }

    fn list_job_numbers(&self) -> Result<Vec<String>, StoreError> {
        Ok(job_repo::list_job_numbers(&self.db)?)
    }

    fn patch_detailed_status(
        &self,
        job_no: &str,
        status: DetailedStatus,
    ) -> Result<(), StoreError> {
        let found =
            job_repo::update_detailed_status(&self.db, job_no, status.as_str(), &db::now_timestamp())?;
        self.require_job(job_no, found)
    }

    fn patch_job_field(
        &self,
        job_no: &str,
        field: JobField,
        value: Option<&str>,
    ) -> Result<(), StoreError> {
        let found = job_repo::update_field(&self.db, job_no, field, value, &db::now_timestamp())?;
        self.require_job(job_no, found)
    }

    fn patch_free_time(&self, job_no: &str, free_time_days: u32) -> Result<(), StoreError> {
        let found =
            job_repo::update_free_time(&self.db, job_no, free_time_days, &db::now_timestamp())?;
        self.require_job(job_no, found)
    }

    fn patch_container_field(
        &self,
        job_no: &str,
        container_number: &str,
        field: ContainerField,
        value: Option<&str>,
    ) -> Result<(), StoreError> {
        if container_repo::update_field(&self.db, job_no, container_number, field, value)? {
            Ok(())
        } else {
            Err(StoreError::ContainerNotFound {
                job_no: job_no.to_string(),
                container_number: container_number.to_string(),
            })
        }
    }

    fn patch_detention_dates(
        &self,
        job_no: &str,
        updates: &[DetentionUpdate],
    ) -> Result<(), StoreError> {
        let touched = container_repo::update_detention_batch(&self.db, job_no, updates)?;
        if touched != updates.len() {
            log::warn!(
                "Job {}: detention batch matched {} of {} container(s)",
                job_no,
                touched,
                updates.len()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::record::ContainerRow;

    fn store_with_job() -> SqliteJobStore {
        let store = SqliteJobStore::open_in_memory().unwrap();
        store
            .insert_job(&JobRecord {
                job_no: "IMP/1".to_string(),
                vessel_berthing: Some("2025-06-01T00:00:00Z".to_string()),
                free_time: 5,
                container_nos: vec![
                    ContainerRow {
                        container_number: "C1".to_string(),
                        arrival_date: Some("2025-06-03".to_string()),
                        ..Default::default()
                    },
                    ContainerRow {
                        container_number: "C2".to_string(),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            })
            .unwrap();
        store
    }

    #[test]
    fn test_fetch_round_trips_containers() {
        let store = store_with_job();
        let record = store.fetch_job("IMP/1").unwrap().unwrap();
        assert_eq!(record.free_time, 5);
        assert_eq!(record.container_nos.len(), 2);
        assert_eq!(record.container_nos[0].container_number, "C1");
        assert_eq!(record.container_nos[1].container_number, "C2");
    }

    #[test]
    fn test_fetch_unknown_job() {
        let store = store_with_job();
        assert!(store.fetch_job("IMP/404").unwrap().is_none());
    }

    #[test]
    fn test_patches_report_unknown_job() {
        let store = store_with_job();
        assert!(matches!(
            store.patch_free_time("IMP/404", 3),
            Err(StoreError::JobNotFound(_))
        ));
        assert!(matches!(
            store.patch_job_field("IMP/404", JobField::PcvDate, None),
            Err(StoreError::JobNotFound(_))
        ));
        assert!(matches!(
            store.patch_detailed_status("IMP/404", DetailedStatus::Discharged),
            Err(StoreError::JobNotFound(_))
        ));
        assert!(matches!(
            store.patch_container_field("IMP/1", "C9", ContainerField::DeliveryDate, None),
            Err(StoreError::ContainerNotFound { .. })
        ));
    }

    #[test]
    fn test_patch_status_uses_display_string() {
        let store = store_with_job();
        store
            .patch_detailed_status("IMP/1", DetailedStatus::ArrivedBeNotePending)
            .unwrap();
        let record = store.fetch_job("IMP/1").unwrap().unwrap();
        assert_eq!(
            record.detailed_status.as_deref(),
            Some("Arrived, BE Note Pending")
        );
    }

    #[test]
    fn test_patch_fields() {
        let store = store_with_job();
        store
            .patch_job_field("IMP/1", JobField::BillOfEntryNumber, Some("BE77"))
            .unwrap();
        store
            .patch_container_field("IMP/1", "C2", ContainerField::RailOutDate, Some("2025-06-02T10:00"))
            .unwrap();

        let record = store.fetch_job("IMP/1").unwrap().unwrap();
        assert_eq!(record.be_no.as_deref(), Some("BE77"));
        assert_eq!(
            record.container_nos[1].container_rail_out_date.as_deref(),
            Some("2025-06-02T10:00")
        );
    }

    #[test]
    fn test_patch_detention_dates() {
        let store = store_with_job();
        store
            .patch_detention_dates(
                "IMP/1",
                &[DetentionUpdate {
                    container_number: "C1".to_string(),
                    detention_from: NaiveDate::from_ymd_opt(2025, 6, 8),
                }],
            )
            .unwrap();
        let record = store.fetch_job("IMP/1").unwrap().unwrap();
        assert_eq!(record.container_nos[0].detention_from.as_deref(), Some("2025-06-08"));
    }

    #[test]
    fn test_insert_job_is_atomic() {
        let store = SqliteJobStore::open_in_memory().unwrap();
        let duplicate = ContainerRow {
            container_number: "C1".to_string(),
            ..Default::default()
        };
        let result = store.insert_job(&JobRecord {
            job_no: "IMP/2".to_string(),
            container_nos: vec![duplicate.clone(), duplicate],
            ..Default::default()
        });

        assert!(matches!(result, Err(StoreError::Database(_))));
        assert!(store.fetch_job("IMP/2").unwrap().is_none());
    }

    #[test]
    fn test_list_job_numbers() {
        let store = store_with_job();
        store
            .insert_job(&JobRecord {
                job_no: "IMP/0".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(store.list_job_numbers().unwrap(), vec!["IMP/0", "IMP/1"]);
    }

    #[test]
    fn test_open_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("jobs.db");
        let store = SqliteJobStore::open(&path).unwrap();
        assert!(store.list_job_numbers().unwrap().is_empty());
        assert!(path.exists());
    }
}

//! Test harness for tracker integration tests.
//!
//! Each `TrackerHarness` owns a temporary directory holding a file-backed
//! SQLite store, so tests exercise the real migrations and repositories.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use cleartrack::deadline::BucketThresholds;
use cleartrack::record::JobRecord;
use cleartrack::store::{JobStore, SqliteJobStore};
use cleartrack::tracker::MilestoneTracker;

pub struct TrackerHarness {
    temp_dir: TempDir,
    pub db_path: PathBuf,
    pub tracker: MilestoneTracker<SqliteJobStore>,
}

impl TrackerHarness {
    pub fn new() -> Self {
        Self::with_thresholds(BucketThresholds::default())
    }

    pub fn with_thresholds(thresholds: BucketThresholds) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("data").join("cleartrack.db");
        let store = SqliteJobStore::open(&db_path).expect("Failed to open job store");

        Self {
            temp_dir,
            db_path,
            tracker: MilestoneTracker::new(store, thresholds),
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Inserts jobs as they would arrive from the job tables.
    pub fn insert(&self, records: &[JobRecord]) {
        for record in records {
            self.tracker
                .store()
                .insert_job(record)
                .expect("Failed to insert job");
        }
    }

    /// Reads a job back from the store.
    pub fn stored(&self, job_no: &str) -> JobRecord {
        self.tracker
            .store()
            .fetch_job(job_no)
            .expect("Failed to fetch job")
            .expect("Job missing from store")
    }

    /// Writes a config file into the temp directory.
    pub fn write_config(&self, filename: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(filename);
        std::fs::write(&path, content).expect("Failed to write config file");
        path
    }
}

//! Job repository: reads and writes rows of the `jobs` table.

use rusqlite::{params, Connection, Row};

use super::{Database, DatabaseError};
use crate::record::{ContainerRow, JobField, JobRecord};

/// A raw job row from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRow {
    pub job_no: String,
    pub be_no: Option<String>,
    pub vessel_berthing: Option<String>,
    pub gateway_igm_date: Option<String>,
    pub discharge_date: Option<String>,
    pub pcv_date: Option<String>,
    pub out_of_charge: Option<String>,
    pub assessment_date: Option<String>,
    pub type_of_b_e: Option<String>,
    pub consignment_type: Option<String>,
    pub free_time: u32,
    pub detailed_status: Option<String>,
    pub status_updated_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl JobRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            job_no: row.get("job_no")?,
            be_no: row.get("be_no")?,
            vessel_berthing: row.get("vessel_berthing")?,
            gateway_igm_date: row.get("gateway_igm_date")?,
            discharge_date: row.get("discharge_date")?,
            pcv_date: row.get("pcv_date")?,
            out_of_charge: row.get("out_of_charge")?,
            assessment_date: row.get("assessment_date")?,
            type_of_b_e: row.get("type_of_b_e")?,
            consignment_type: row.get("consignment_type")?,
            free_time: row.get("free_time")?,
            detailed_status: row.get("detailed_status")?,
            status_updated_at: row.get("status_updated_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// New row for a record, stamped with `now`.
    pub fn from_record(record: &JobRecord, now: &str) -> Self {
        Self {
            job_no: record.job_no.clone(),
            be_no: record.be_no.clone(),
            vessel_berthing: record.vessel_berthing.clone(),
            gateway_igm_date: record.gateway_igm_date.clone(),
            discharge_date: record.discharge_date.clone(),
            pcv_date: record.pcv_date.clone(),
            out_of_charge: record.out_of_charge.clone(),
            assessment_date: record.assessment_date.clone(),
            type_of_b_e: record.type_of_b_e.clone(),
            consignment_type: record.consignment_type.clone(),
            free_time: record.free_time,
            detailed_status: record.detailed_status.clone(),
            status_updated_at: None,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn into_record(self, container_nos: Vec<ContainerRow>) -> JobRecord {
        JobRecord {
            job_no: self.job_no,
            be_no: self.be_no,
            vessel_berthing: self.vessel_berthing,
            gateway_igm_date: self.gateway_igm_date,
            discharge_date: self.discharge_date,
            pcv_date: self.pcv_date,
            out_of_charge: self.out_of_charge,
            assessment_date: self.assessment_date,
            type_of_b_e: self.type_of_b_e,
            consignment_type: self.consignment_type,
            free_time: self.free_time,
            detailed_status: self.detailed_status,
            container_nos,
        }
    }
}

/// Inserts a new job row.
pub fn insert(db: &Database, job: &JobRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| insert_in(conn, job))
}

/// [`insert`] on a caller-held connection or transaction.
pub fn insert_in(conn: &Connection, job: &JobRow) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO jobs (job_no, be_no, vessel_berthing, gateway_igm_date, discharge_date,
         pcv_date, out_of_charge, assessment_date, type_of_b_e, consignment_type, free_time,
         detailed_status, status_updated_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            job.job_no,
            job.be_no,
            job.vessel_berthing,
            job.gateway_igm_date,
            job.discharge_date,
            job.pcv_date,
            job.out_of_charge,
            job.assessment_date,
            job.type_of_b_e,
            job.consignment_type,
            job.free_time,
            job.detailed_status,
            job.status_updated_at,
            job.created_at,
            job.updated_at,
        ],
    )?;
    Ok(())
}

/// Finds a job by its number.
pub fn find_by_id(db: &Database, job_no: &str) -> Result<Option<JobRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM jobs WHERE job_no = ?1")?;
        let mut rows = stmt.query_map(params![job_no], JobRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Lists job numbers in job-number order.
pub fn list_job_numbers(db: &Database) -> Result<Vec<String>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT job_no FROM jobs ORDER BY job_no")?;
        let rows = stmt.query_map([], |r| r.get(0))?;
        Ok(rows.collect::<Result<Vec<String>, _>>()?)
    })
}

/// Overwrites one classification field. Returns false when the job is unknown.
pub fn update_field(
    db: &Database,
    job_no: &str,
    field: JobField,
    value: Option<&str>,
    updated_at: &str,
) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        // Column names come from a closed enum, never from input.
        let sql = format!(
            "UPDATE jobs SET {} = ?2, updated_at = ?3 WHERE job_no = ?1",
            field.column()
        );
        let changed = conn.execute(&sql, params![job_no, value, updated_at])?;
        Ok(changed > 0)
    })
}

/// Updates the job-level free time allowance.
pub fn update_free_time(
    db: &Database,
    job_no: &str,
    free_time: u32,
    updated_at: &str,
) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE jobs SET free_time = ?2, updated_at = ?3 WHERE job_no = ?1",
            params![job_no, free_time, updated_at],
        )?;
        Ok(changed > 0)
    })
}

/// Updates only the derived status and its timestamps.
pub fn update_detailed_status(
    db: &Database,
    job_no: &str,
    status: &str,
    updated_at: &str,
) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE jobs SET detailed_status = ?2, status_updated_at = ?3, updated_at = ?3
             WHERE job_no = ?1",
            params![job_no, status, updated_at],
        )?;
        Ok(changed > 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    fn sample_job(job_no: &str) -> JobRow {
        JobRow {
            job_no: job_no.to_string(),
            be_no: None,
            vessel_berthing: Some("2025-06-01T00:00:00Z".to_string()),
            gateway_igm_date: None,
            discharge_date: None,
            pcv_date: None,
            out_of_charge: None,
            assessment_date: None,
            type_of_b_e: Some("Normal".to_string()),
            consignment_type: Some("FCL".to_string()),
            free_time: 7,
            detailed_status: Some("Estimated Time of Arrival".to_string()),
            status_updated_at: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_insert_and_find() {
        let db = test_db();
        insert(&db, &sample_job("IMP/1")).unwrap();

        let found = find_by_id(&db, "IMP/1").unwrap().unwrap();
        assert_eq!(found.free_time, 7);
        assert_eq!(found.vessel_berthing.as_deref(), Some("2025-06-01T00:00:00Z"));
        assert_eq!(found, sample_job("IMP/1"));
    }

    #[test]
    fn test_find_nonexistent() {
        let db = test_db();
        assert!(find_by_id(&db, "nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_insert_fails() {
        let db = test_db();
        insert(&db, &sample_job("IMP/1")).unwrap();
        assert!(insert(&db, &sample_job("IMP/1")).is_err());
    }

    #[test]
    fn test_update_field() {
        let db = test_db();
        insert(&db, &sample_job("IMP/2")).unwrap();

        let changed = update_field(
            &db,
            "IMP/2",
            JobField::DischargeDate,
            Some("2025-06-02"),
            "2026-01-02T00:00:00Z",
        )
        .unwrap();
        assert!(changed);

        let found = find_by_id(&db, "IMP/2").unwrap().unwrap();
        assert_eq!(found.discharge_date.as_deref(), Some("2025-06-02"));
        assert_eq!(found.updated_at, "2026-01-02T00:00:00Z");

        update_field(&db, "IMP/2", JobField::DischargeDate, None, "t").unwrap();
        let found = find_by_id(&db, "IMP/2").unwrap().unwrap();
        assert_eq!(found.discharge_date, None);
    }

    #[test]
    fn test_update_unknown_job() {
        let db = test_db();
        assert!(!update_field(&db, "nope", JobField::PcvDate, Some("x"), "t").unwrap());
        assert!(!update_free_time(&db, "nope", 3, "t").unwrap());
        assert!(!update_detailed_status(&db, "nope", "Discharged", "t").unwrap());
    }

    #[test]
    fn test_update_detailed_status_stamps_time() {
        let db = test_db();
        insert(&db, &sample_job("IMP/3")).unwrap();

        update_detailed_status(&db, "IMP/3", "Discharged", "2026-01-03T00:00:00Z").unwrap();
        let found = find_by_id(&db, "IMP/3").unwrap().unwrap();
        assert_eq!(found.detailed_status.as_deref(), Some("Discharged"));
        assert_eq!(found.status_updated_at.as_deref(), Some("2026-01-03T00:00:00Z"));
    }

    #[test]
    fn test_list_job_numbers_sorted() {
        let db = test_db();
        assert!(list_job_numbers(&db).unwrap().is_empty());

        for n in ["IMP/3", "IMP/1", "IMP/2"] {
            insert(&db, &sample_job(n)).unwrap();
        }
        assert_eq!(list_job_numbers(&db).unwrap(), vec!["IMP/1", "IMP/2", "IMP/3"]);
    }

    #[test]
    fn test_record_conversion() {
        let record = JobRecord {
            job_no: "IMP/9".to_string(),
            be_no: Some("BE9".to_string()),
            free_time: 4,
            ..Default::default()
        };
        let row = JobRow::from_record(&record, "2026-01-01T00:00:00Z");
        assert_eq!(row.created_at, row.updated_at);
        assert_eq!(row.into_record(vec![]), record);
    }
}

//! Container repository: rows of the `containers` table, keyed by
//! `(job_no, container_number)` and ordered by `position`.

use rusqlite::{params, Connection, Row};

use super::{Database, DatabaseError};
use crate::detention::DetentionUpdate;
use crate::record::{ContainerField, ContainerRow};

fn from_row(row: &Row<'_>) -> Result<ContainerRow, rusqlite::Error> {
    Ok(ContainerRow {
        container_number: row.get("container_number")?,
        arrival_date: row.get("arrival_date")?,
        container_rail_out_date: row.get("container_rail_out_date")?,
        empty_container_off_load_date: row.get("empty_container_off_load_date")?,
        delivery_date: row.get("delivery_date")?,
        detention_from: row.get("detention_from")?,
    })
}

/// Inserts a container for a job at the given list position.
pub fn insert(
    db: &Database,
    job_no: &str,
    position: u32,
    container: &ContainerRow,
) -> Result<(), DatabaseError> {
    db.with_conn(|conn| insert_in(conn, job_no, position, container))
}

/// [`insert`] on a caller-held connection or transaction.
pub fn insert_in(
    conn: &Connection,
    job_no: &str,
    position: u32,
    container: &ContainerRow,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO containers (job_no, container_number, position, arrival_date,
         container_rail_out_date, empty_container_off_load_date, delivery_date, detention_from)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            job_no,
            container.container_number,
            position,
            container.arrival_date,
            container.container_rail_out_date,
            container.empty_container_off_load_date,
            container.delivery_date,
            container.detention_from,
        ],
    )?;
    Ok(())
}

/// Lists a job's containers in their original order.
pub fn list_by_job(db: &Database, job_no: &str) -> Result<Vec<ContainerRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT * FROM containers WHERE job_no = ?1 ORDER BY position")?;
        let rows = stmt.query_map(params![job_no], from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    })
}

/// Overwrites one container date. Returns false when the container is unknown.
pub fn update_field(
    db: &Database,
    job_no: &str,
    container_number: &str,
    field: ContainerField,
    value: Option<&str>,
) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let sql = format!(
            "UPDATE containers SET {} = ?3 WHERE job_no = ?1 AND container_number = ?2",
            field.column()
        );
        let changed = conn.execute(&sql, params![job_no, container_number, value])?;
        Ok(changed > 0)
    })
}

/// Writes detention dates for several containers in one transaction.
///
/// Returns the number of rows touched. Updates naming an unknown container
/// are skipped; any SQLite failure rolls the whole batch back.
pub fn update_detention_batch(
    db: &Database,
    job_no: &str,
    updates: &[DetentionUpdate],
) -> Result<usize, DatabaseError> {
    db.with_transaction(|tx| {
        let mut stmt = tx.prepare(
            "UPDATE containers SET detention_from = ?3
             WHERE job_no = ?1 AND container_number = ?2",
        )?;
        let mut touched = 0;
        for update in updates {
            touched += stmt.execute(params![
                job_no,
                update.container_number,
                update.persisted_value()
            ])?;
        }
        Ok(touched)
    })
}

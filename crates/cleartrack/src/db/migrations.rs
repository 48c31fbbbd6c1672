//! Schema migrations for the job store.
//!
//! Applied versions are recorded in `_migrations`. Each pending migration
//! runs in its own transaction together with its bookkeeping row, so a
//! failed migration leaves the schema at the previous version.

use rusqlite::{params, Connection};

use super::error::DatabaseError;

struct Migration {
    version: u32,
    description: &'static str,
    sql: &'static str,
    /// For `ALTER TABLE ... ADD COLUMN`: the column that makes it a no-op.
    adds_column: Option<(&'static str, &'static str)>,
}

impl Migration {
    fn is_redundant(&self, conn: &Connection) -> Result<bool, DatabaseError> {
        match self.adds_column {
            Some((table, column)) => column_exists(conn, table, column),
            None => Ok(false),
        }
    }

    fn apply(&self, conn: &Connection) -> Result<(), DatabaseError> {
        let failed = |e: rusqlite::Error| DatabaseError::Migration {
            version: self.version,
            reason: e.to_string(),
        };

        let redundant = self.is_redundant(conn)?;
        let tx = conn.unchecked_transaction()?;
        if redundant {
            log::info!(
                "Migration v{} ({}) already reflected in schema, recording only",
                self.version,
                self.description
            );
        } else {
            log::info!("Applying migration v{}: {}", self.version, self.description);
            tx.execute_batch(self.sql).map_err(failed)?;
        }
        tx.execute(
            "INSERT INTO _migrations (version, description) VALUES (?1, ?2)",
            params![self.version, self.description],
        )
        .map_err(failed)?;
        tx.commit().map_err(failed)
    }
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create_jobs_table",
        sql: include_str!("sql/001_create_jobs.sql"),
        adds_column: None,
    },
    Migration {
        version: 2,
        description: "create_containers_table",
        sql: include_str!("sql/002_create_containers.sql"),
        adds_column: None,
    },
    Migration {
        version: 3,
        description: "add_status_updated_at_to_jobs",
        sql: include_str!("sql/003_add_status_updated_at.sql"),
        adds_column: Some(("jobs", "status_updated_at")),
    },
];

/// Highest migration version this build knows about.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Highest applied version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> Result<u32, DatabaseError> {
    Ok(conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM _migrations",
        [],
        |r| r.get(0),
    )?)
}

/// Brings the schema up to [`latest_version`].
pub fn run_all(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let current = current_version(conn)?;
    if current > latest_version() {
        log::warn!(
            "Database schema v{} is newer than this build (v{})",
            current,
            latest_version()
        );
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        migration.apply(conn)?;
    }

    Ok(())
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool, DatabaseError> {
    // PRAGMA arguments cannot be bound, so only plain identifiers get through.
    if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DatabaseError::Migration {
            version: 0,
            reason: format!("Invalid table name: {}", table),
        });
    }
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt.query_map([], |row| row.get::<_, String>("name"))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

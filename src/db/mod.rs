//! Database layer for the kanban server.

pub mod boards;
pub mod jobs;
pub mod links;
pub mod listing;
pub mod priorities;
pub mod seed;
pub mod tasks;

use anyhow::{Result, anyhow};
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

pub use seed::SeedOutcome;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Database handle wrapping a SQLite connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;",
        )?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;

        Ok(db)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))
    }

    /// Run database migrations.
    fn run_migrations(&self) -> Result<()> {
        let mut conn = self.lock()?;
        let report = embedded::migrations::runner().run(&mut *conn)?;
        for migration in report.applied_migrations() {
            tracing::debug!(
                version = migration.version(),
                migration = migration.name(),
                "Applied migration"
            );
        }
        Ok(())
    }

    /// Execute a read-only function with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Execute a function inside a transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back when it
    /// returns `Err`, so a failed multi-step mutation leaves no partial rows.
    pub fn with_tx<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

/// Trim a form title and check it against a length limit.
pub(crate) fn normalize_title(field: &str, title: &str, max_len: usize) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(crate::error::AppError::missing_field(field).into());
    }
    let len = title.chars().count();
    if len > max_len {
        return Err(crate::error::AppError::invalid_value(
            field,
            format!("{} must be at most {} characters, got {}", field, max_len, len),
        )
        .into());
    }
    Ok(title.to_string())
}

/// Map an empty or whitespace-only description to `None`.
pub(crate) fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

/// Count rows in a table. `table` is interpolated, so callers pass literals.
pub(crate) fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}

impl Database {
    /// Number of rows in one of the kanban tables. Other names are rejected.
    pub fn table_count(&self, table: &str) -> Result<i64> {
        const TABLES: [&str; 6] = [
            "boards",
            "jobs",
            "tasks",
            "priorities",
            "boards_jobs",
            "boards_jobs_tasks",
        ];
        if !TABLES.contains(&table) {
            return Err(anyhow!("unknown table: {}", table));
        }
        self.with_conn(|conn| count_rows(conn, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, error_code};

    #[test]
    fn normalize_title_trims_and_checks_length() {
        assert_eq!(normalize_title("title", "  Design  ", 30).unwrap(), "Design");

        let err = normalize_title("title", "   ", 30).unwrap_err();
        assert_eq!(error_code(&err), Some(ErrorCode::MissingRequiredField));

        let err = normalize_title("title", &"x".repeat(31), 30).unwrap_err();
        assert_eq!(error_code(&err), Some(ErrorCode::InvalidFieldValue));
    }

    #[test]
    fn normalize_description_drops_blank() {
        assert_eq!(normalize_description(Some("")), None);
        assert_eq!(normalize_description(Some("  ")), None);
        assert_eq!(normalize_description(None), None);
        assert_eq!(
            normalize_description(Some(" notes ")),
            Some("notes".to_string())
        );
    }

    #[test]
    fn migrations_create_all_tables() {
        let db = Database::open_in_memory().unwrap();
        for table in ["boards", "jobs", "tasks", "priorities", "boards_jobs", "boards_jobs_tasks"] {
            assert_eq!(db.table_count(table).unwrap(), 0, "{table} should start empty");
        }
        assert!(db.table_count("sqlite_master").is_err());
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        let result: Result<()> = db.with_tx(|tx| {
            tx.execute("INSERT INTO boards (title) VALUES ('Scratch')", [])?;
            Err(anyhow!("abort"))
        });
        assert!(result.is_err());
        assert_eq!(db.table_count("boards").unwrap(), 0);
    }
}

//! First-run seeding of priorities and default boards.

use super::{Database, count_rows};
use anyhow::Result;
use rusqlite::params;

/// Fixed priority levels as (code, title).
pub const PRIORITIES: [(&str, &str); 4] = [
    ("none", "None"),
    ("min", "Minor"),
    ("med", "Medium"),
    ("urg", "Urgent"),
];

/// Default boards as (title, description).
pub const DEFAULT_BOARDS: [(&str, &str); 3] = [
    ("To Do", "Things to do"),
    ("Doing", "Things I'm working on"),
    ("Done", "Completed tasks"),
];

/// What a call to [`Database::seed`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded,
    AlreadySeeded,
}

impl Database {
    /// Whether the fixed priorities have been written.
    pub fn is_seeded(&self) -> Result<bool> {
        self.with_conn(|conn| Ok(count_rows(conn, "priorities")? > 0))
    }

    /// Populate priorities and the default boards once.
    ///
    /// A database that already has priorities is left untouched.
    pub fn seed(&self) -> Result<SeedOutcome> {
        let outcome = self.with_tx(|tx| {
            if count_rows(tx, "priorities")? > 0 {
                return Ok(SeedOutcome::AlreadySeeded);
            }

            for (code, title) in PRIORITIES {
                tx.execute(
                    "INSERT INTO priorities (code, title) VALUES (?1, ?2)",
                    params![code, title],
                )?;
            }
            // A board created before seeding keeps its own description.
            for (title, description) in DEFAULT_BOARDS {
                tx.execute(
                    "INSERT INTO boards (title, description) VALUES (?1, ?2)
                     ON CONFLICT (title) DO NOTHING",
                    params![title, description],
                )?;
            }

            Ok(SeedOutcome::Seeded)
        })?;

        match outcome {
            SeedOutcome::Seeded => tracing::info!(
                priorities = PRIORITIES.len(),
                boards = DEFAULT_BOARDS.len(),
                "Seeded database"
            ),
            SeedOutcome::AlreadySeeded => tracing::debug!("Database already seeded"),
        }
        Ok(outcome)
    }
}

//! Priority lookups.

use super::Database;
use crate::types::Priority;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};

pub(crate) fn get_priority_internal(conn: &Connection, code: &str) -> Result<Option<Priority>> {
    let priority = conn
        .query_row(
            "SELECT code, title FROM priorities WHERE code = ?1",
            params![code],
            |row| {
                Ok(Priority {
                    code: row.get(0)?,
                    title: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(priority)
}

impl Database {
    /// All priorities in the order they were seeded.
    pub fn list_priorities(&self) -> Result<Vec<Priority>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT code, title FROM priorities ORDER BY rowid")?;
            let priorities = stmt
                .query_map([], |row| {
                    Ok(Priority {
                        code: row.get(0)?,
                        title: row.get(1)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(priorities)
        })
    }

    /// Get a priority by code.
    pub fn get_priority(&self, code: &str) -> Result<Option<Priority>> {
        self.with_conn(|conn| get_priority_internal(conn, code))
    }
}

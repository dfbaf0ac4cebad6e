//! Job operations.

use super::boards::require_board_internal;
use super::links::find_or_create_board_job_internal;
use super::{Database, normalize_description, normalize_title};
use crate::error::AppError;
use crate::types::{BoardJob, Job, MAX_JOB_TITLE_LEN};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub(crate) fn job_from_row(row: &Row<'_>) -> rusqlite::Result<Job> {
    Ok(Job {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        complete: row.get(3)?,
    })
}

pub(crate) fn get_job_internal(conn: &Connection, job_id: i64) -> Result<Option<Job>> {
    let job = conn
        .query_row(
            "SELECT id, title, description, complete FROM jobs WHERE id = ?1",
            params![job_id],
            job_from_row,
        )
        .optional()?;
    Ok(job)
}

pub(crate) fn require_job_internal(conn: &Connection, job_id: i64) -> Result<Job> {
    get_job_internal(conn, job_id)?.ok_or_else(|| AppError::job_not_found(job_id).into())
}

impl Database {
    /// Create a job and place it on a board.
    ///
    /// The job row and its board link are written in one transaction; an
    /// unknown board leaves nothing behind.
    pub fn create_job_on_board(
        &self,
        board_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> Result<(Job, BoardJob)> {
        let title = normalize_title("title", title, MAX_JOB_TITLE_LEN)?;
        let description = normalize_description(description);

        let (job, board_job) = self.with_tx(|tx| {
            require_board_internal(tx, board_id)?;

            let id: i64 = tx.query_row(
                "INSERT INTO jobs (title, description) VALUES (?1, ?2) RETURNING id",
                params![&title, &description],
                |row| row.get(0),
            )?;
            let board_job = find_or_create_board_job_internal(tx, board_id, id)?;

            Ok((
                Job {
                    id,
                    title,
                    description,
                    complete: false,
                },
                board_job,
            ))
        })?;

        tracing::info!(board_id, job_id = job.id, board_job_id = board_job.id, "Created job");
        Ok((job, board_job))
    }

    /// Get a job by ID.
    pub fn get_job(&self, job_id: i64) -> Result<Option<Job>> {
        self.with_conn(|conn| get_job_internal(conn, job_id))
    }

    /// Mark a job complete or incomplete.
    pub fn set_job_complete(&self, job_id: i64, complete: bool) -> Result<Job> {
        let job = self.with_tx(|tx| {
            let updated = tx.execute(
                "UPDATE jobs SET complete = ?1 WHERE id = ?2",
                params![complete, job_id],
            )?;
            if updated == 0 {
                return Err(AppError::job_not_found(job_id).into());
            }
            require_job_internal(tx, job_id)
        })?;
        tracing::info!(job_id, complete, "Updated job completion");
        Ok(job)
    }

    /// Boards a job is shown on, in link order.
    pub fn boards_for_job(&self, job_id: i64) -> Result<Vec<i64>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT board_id FROM boards_jobs WHERE job_id = ?1 ORDER BY id")?;
            let ids = stmt
                .query_map(params![job_id], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<i64>>>()?;
            Ok(ids)
        })
    }
}

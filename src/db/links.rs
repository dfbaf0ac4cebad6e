//! Board/job and board-job/task link resolution.
//!
//! `boards_jobs` carries a UNIQUE(board_id, job_id) constraint, so the
//! find-or-create path is an upsert followed by a select. A lookup that still
//! sees more than one row reports `DuplicateLink` instead of repairing data.

use super::Database;
use super::boards::require_board_internal;
use super::jobs::require_job_internal;
use crate::error::AppError;
use crate::types::{BoardJob, BoardJobTask};
use anyhow::Result;
use rusqlite::{Connection, params};

pub(crate) fn find_board_job_internal(
    conn: &Connection,
    board_id: i64,
    job_id: i64,
) -> Result<Option<BoardJob>> {
    let mut stmt = conn.prepare(
        "SELECT id, board_id, job_id FROM boards_jobs
         WHERE board_id = ?1 AND job_id = ?2
         ORDER BY id",
    )?;
    let mut rows = stmt
        .query_map(params![board_id, job_id], |row| {
            Ok(BoardJob {
                id: row.get(0)?,
                board_id: row.get(1)?,
                job_id: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    match rows.len() {
        0 => Ok(None),
        1 => Ok(rows.pop()),
        n => Err(AppError::duplicate_link(board_id, job_id, n).into()),
    }
}

pub(crate) fn require_board_job_internal(
    conn: &Connection,
    board_id: i64,
    job_id: i64,
) -> Result<BoardJob> {
    find_board_job_internal(conn, board_id, job_id)?
        .ok_or_else(|| AppError::board_job_not_found(board_id, job_id).into())
}

pub(crate) fn find_or_create_board_job_internal(
    conn: &Connection,
    board_id: i64,
    job_id: i64,
) -> Result<BoardJob> {
    require_board_internal(conn, board_id)?;
    require_job_internal(conn, job_id)?;

    let inserted = conn.execute(
        "INSERT INTO boards_jobs (board_id, job_id) VALUES (?1, ?2)
         ON CONFLICT (board_id, job_id) DO NOTHING",
        params![board_id, job_id],
    )?;
    if inserted > 0 {
        tracing::debug!(board_id, job_id, "Created board/job link");
    }
    require_board_job_internal(conn, board_id, job_id)
}

/// Link a task to a board/job pairing. Returns whether a new row was written.
pub(crate) fn link_task_internal(conn: &Connection, board_job_id: i64, task_id: i64) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT INTO boards_jobs_tasks (board_job_id, task_id) VALUES (?1, ?2)
         ON CONFLICT (board_job_id, task_id) DO NOTHING",
        params![board_job_id, task_id],
    )?;
    Ok(inserted > 0)
}

pub(crate) fn task_links_internal(conn: &Connection, task_id: i64) -> Result<Vec<BoardJobTask>> {
    let mut stmt = conn.prepare(
        "SELECT id, board_job_id, task_id FROM boards_jobs_tasks
         WHERE task_id = ?1 ORDER BY id",
    )?;
    let links = stmt
        .query_map(params![task_id], |row| {
            Ok(BoardJobTask {
                id: row.get(0)?,
                board_job_id: row.get(1)?,
                task_id: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(links)
}

impl Database {
    /// Look up the link between a board and a job.
    ///
    /// Returns `None` when the job is not on the board. Never creates a link.
    pub fn find_board_job(&self, board_id: i64, job_id: i64) -> Result<Option<BoardJob>> {
        self.with_conn(|conn| find_board_job_internal(conn, board_id, job_id))
    }

    /// Look up the link between a board and a job, failing with
    /// `BoardJobNotFound` when absent.
    pub fn require_board_job(&self, board_id: i64, job_id: i64) -> Result<BoardJob> {
        self.with_conn(|conn| require_board_job_internal(conn, board_id, job_id))
    }

    /// Return the unique link for (board, job), creating it if absent.
    pub fn find_or_create_board_job(&self, board_id: i64, job_id: i64) -> Result<BoardJob> {
        self.with_tx(|tx| find_or_create_board_job_internal(tx, board_id, job_id))
    }

    /// All links for a task, lowest id first.
    pub fn task_links(&self, task_id: i64) -> Result<Vec<BoardJobTask>> {
        self.with_conn(|conn| task_links_internal(conn, task_id))
    }

    /// Boards a task is currently shown on, in link order.
    pub fn boards_for_task(&self, task_id: i64) -> Result<Vec<i64>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT bj.board_id FROM boards_jobs_tasks bjt
                 JOIN boards_jobs bj ON bj.id = bjt.board_job_id
                 WHERE bjt.task_id = ?1
                 ORDER BY bjt.id",
            )?;
            let ids = stmt
                .query_map(params![task_id], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<i64>>>()?;
            Ok(ids)
        })
    }
}

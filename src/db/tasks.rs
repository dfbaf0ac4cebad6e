//! Task operations: creation on a board/job pairing, moves, and edits.

use super::boards::require_board_internal;
use super::jobs::require_job_internal;
use super::links::{
    find_or_create_board_job_internal, link_task_internal, require_board_job_internal,
};
use super::priorities::get_priority_internal;
use super::{Database, normalize_title};
use crate::error::AppError;
use crate::types::{
    BoardJobTask, DEFAULT_PRIORITY_CODE, MAX_TASK_TITLE_LEN, MoveMode, MoveOutcome, Task,
};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub(crate) fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        complete: row.get(2)?,
        priority_code: row.get(3)?,
        job_id: row.get(4)?,
    })
}

pub(crate) fn get_task_internal(conn: &Connection, task_id: i64) -> Result<Option<Task>> {
    let task = conn
        .query_row(
            "SELECT id, title, complete, priority_code, job_id FROM tasks WHERE id = ?1",
            params![task_id],
            task_from_row,
        )
        .optional()?;
    Ok(task)
}

fn require_task_internal(conn: &Connection, task_id: i64) -> Result<Task> {
    get_task_internal(conn, task_id)?.ok_or_else(|| AppError::task_not_found(task_id).into())
}

impl Database {
    /// Create a task under a job as shown on a given board.
    ///
    /// The job must already be on the board; there is no creation fallback.
    /// On any failure nothing is written.
    pub fn create_task_on_job(
        &self,
        job_id: i64,
        board_id: i64,
        title: &str,
    ) -> Result<(Task, BoardJobTask)> {
        let title = normalize_title("title", title, MAX_TASK_TITLE_LEN)?;

        let (task, link) = self.with_tx(|tx| {
            require_job_internal(tx, job_id)?;
            let board_job = require_board_job_internal(tx, board_id, job_id)?;
            if get_priority_internal(tx, DEFAULT_PRIORITY_CODE)?.is_none() {
                return Err(AppError::priority_not_found(DEFAULT_PRIORITY_CODE).into());
            }

            let id: i64 = tx.query_row(
                "INSERT INTO tasks (title, priority_code, job_id) VALUES (?1, ?2, ?3) RETURNING id",
                params![&title, DEFAULT_PRIORITY_CODE, job_id],
                |row| row.get(0),
            )?;
            let link_id: i64 = tx.query_row(
                "INSERT INTO boards_jobs_tasks (board_job_id, task_id) VALUES (?1, ?2) RETURNING id",
                params![board_job.id, id],
                |row| row.get(0),
            )?;

            Ok((
                Task {
                    id,
                    title,
                    complete: false,
                    priority_code: DEFAULT_PRIORITY_CODE.to_string(),
                    job_id,
                },
                BoardJobTask {
                    id: link_id,
                    board_job_id: board_job.id,
                    task_id: id,
                },
            ))
        })?;

        tracing::info!(task_id = task.id, job_id, board_id, "Created task");
        Ok((task, link))
    }

    /// Get a task by ID.
    pub fn get_task(&self, task_id: i64) -> Result<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, task_id))
    }

    /// Show a task on another board.
    ///
    /// Finds or creates the destination board's link for the task's job and
    /// links the task to it. In `Replace` mode the task's links on other
    /// boards for the same job are removed; in `Retain` mode they stay.
    /// Moving to a board the task is already on changes nothing.
    pub fn move_task(&self, task_id: i64, board_id: i64, mode: MoveMode) -> Result<MoveOutcome> {
        let outcome = self.with_tx(|tx| {
            let task = require_task_internal(tx, task_id)?;
            require_board_internal(tx, board_id)?;

            let board_job = find_or_create_board_job_internal(tx, board_id, task.job_id)?;
            let linked = link_task_internal(tx, board_job.id, task.id)?;

            // Already on the destination: leave every link as it is.
            let unlinked = match mode {
                MoveMode::Replace if linked => tx.execute(
                    "DELETE FROM boards_jobs_tasks
                     WHERE task_id = ?1
                       AND board_job_id IN (
                           SELECT id FROM boards_jobs WHERE job_id = ?2 AND board_id != ?3
                       )",
                    params![task.id, task.job_id, board_id],
                )?,
                MoveMode::Replace | MoveMode::Retain => 0,
            };

            Ok(MoveOutcome {
                board_job,
                linked,
                unlinked,
            })
        })?;

        tracing::info!(
            task_id,
            board_id,
            %mode,
            linked = outcome.linked,
            unlinked = outcome.unlinked,
            "Moved task"
        );
        Ok(outcome)
    }

    /// Mark a task complete or incomplete.
    pub fn set_task_complete(&self, task_id: i64, complete: bool) -> Result<Task> {
        let task = self.with_tx(|tx| {
            let updated = tx.execute(
                "UPDATE tasks SET complete = ?1 WHERE id = ?2",
                params![complete, task_id],
            )?;
            if updated == 0 {
                return Err(AppError::task_not_found(task_id).into());
            }
            require_task_internal(tx, task_id)
        })?;
        tracing::info!(task_id, complete, "Updated task completion");
        Ok(task)
    }

    /// Change a task's priority. The code must name a seeded priority.
    pub fn set_task_priority(&self, task_id: i64, code: &str) -> Result<Task> {
        let code = code.trim();
        let task = self.with_tx(|tx| {
            require_task_internal(tx, task_id)?;
            if get_priority_internal(tx, code)?.is_none() {
                return Err(AppError::invalid_value(
                    "code",
                    format!("Unknown priority code: {}", code),
                )
                .into());
            }
            tx.execute(
                "UPDATE tasks SET priority_code = ?1 WHERE id = ?2",
                params![code, task_id],
            )?;
            require_task_internal(tx, task_id)
        })?;
        tracing::info!(task_id, priority = %task.priority_code, "Updated task priority");
        Ok(task)
    }

    /// Tasks belonging to a job, lowest id first.
    pub fn tasks_for_job(&self, job_id: i64) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, complete, priority_code, job_id FROM tasks
                 WHERE job_id = ?1 ORDER BY id",
            )?;
            let tasks = stmt
                .query_map(params![job_id], task_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }
}

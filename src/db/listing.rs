//! Nested board listing: boards, the jobs shown on each, and the tasks shown
//! under each board's rendering of a job.

use super::Database;
use super::boards::list_boards_internal;
use crate::types::{BoardView, Job, JobView, Task, TaskView};
use anyhow::Result;
use rusqlite::Connection;
use std::collections::HashMap;

fn board_listing_internal(conn: &Connection) -> Result<Vec<BoardView>> {
    let mut boards: Vec<BoardView> = list_boards_internal(conn)?
        .into_iter()
        .map(|board| BoardView {
            board,
            jobs: Vec::new(),
        })
        .collect();
    let board_index: HashMap<i64, usize> = boards
        .iter()
        .enumerate()
        .map(|(i, b)| (b.board.id, i))
        .collect();

    // board_job_id -> (board position, job position)
    let mut job_index: HashMap<i64, (usize, usize)> = HashMap::new();

    let mut stmt = conn.prepare(
        "SELECT bj.id, bj.board_id, j.id, j.title, j.description, j.complete
         FROM boards_jobs bj
         JOIN jobs j ON j.id = bj.job_id
         ORDER BY bj.id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                Job {
                    id: row.get(2)?,
                    title: row.get(3)?,
                    description: row.get(4)?,
                    complete: row.get(5)?,
                },
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    for (board_job_id, board_id, job) in rows {
        let Some(&bi) = board_index.get(&board_id) else {
            continue;
        };
        let jobs = &mut boards[bi].jobs;
        job_index.insert(board_job_id, (bi, jobs.len()));
        jobs.push(JobView {
            board_job_id,
            job,
            tasks: Vec::new(),
        });
    }

    let mut stmt = conn.prepare(
        "SELECT bjt.board_job_id, t.id, t.title, t.complete, t.priority_code, t.job_id, p.title
         FROM boards_jobs_tasks bjt
         JOIN tasks t ON t.id = bjt.task_id
         JOIN priorities p ON p.code = t.priority_code
         ORDER BY bjt.id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                TaskView {
                    task: Task {
                        id: row.get(1)?,
                        title: row.get(2)?,
                        complete: row.get(3)?,
                        priority_code: row.get(4)?,
                        job_id: row.get(5)?,
                    },
                    priority_title: row.get(6)?,
                },
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    for (board_job_id, task) in rows {
        if let Some(&(bi, ji)) = job_index.get(&board_job_id) {
            boards[bi].jobs[ji].tasks.push(task);
        }
    }

    Ok(boards)
}

impl Database {
    /// Every board with its jobs and tasks, lowest ids first.
    pub fn board_listing(&self) -> Result<Vec<BoardView>> {
        self.with_conn(board_listing_internal)
    }
}

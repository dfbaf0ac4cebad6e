//! Core record types for the kanban server.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a board title.
pub const MAX_BOARD_TITLE_LEN: usize = 30;

/// Maximum length of a job title.
pub const MAX_JOB_TITLE_LEN: usize = 30;

/// Maximum length of a task title.
pub const MAX_TASK_TITLE_LEN: usize = 40;

/// Priority code assigned to new tasks.
pub const DEFAULT_PRIORITY_CODE: &str = "none";

/// A kanban board (a lane in the listing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
}

/// A job that can be broken down into many tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub complete: bool,
}

/// A task in a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub complete: bool,
    pub priority_code: String,
    pub job_id: i64,
}

/// A fixed severity label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    pub code: String,
    pub title: String,
}

/// Link between one board and one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardJob {
    pub id: i64,
    pub board_id: i64,
    pub job_id: i64,
}

/// Link between a board/job pairing and a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardJobTask {
    pub id: i64,
    pub board_job_id: i64,
    pub task_id: i64,
}

/// What happens to a task's old board link when it is moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveMode {
    /// The task leaves every other board it was shown on for the same job.
    #[default]
    Replace,
    /// The task keeps its existing links and gains one on the destination.
    Retain,
}

impl fmt::Display for MoveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveMode::Replace => write!(f, "replace"),
            MoveMode::Retain => write!(f, "retain"),
        }
    }
}

impl FromStr for MoveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "replace" | "move" => Ok(MoveMode::Replace),
            "retain" | "keep" => Ok(MoveMode::Retain),
            other => Err(format!(
                "unknown move mode '{}', expected 'replace' or 'retain'",
                other
            )),
        }
    }
}

/// Result of a task move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    /// The link on the destination board.
    pub board_job: BoardJob,
    /// Whether a new task link was written.
    pub linked: bool,
    /// Number of links removed from other boards.
    pub unlinked: usize,
}

/// A task as shown under a board's rendering of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub priority_title: String,
}

/// A job as shown on one board, with the tasks linked through that board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobView {
    pub board_job_id: i64,
    #[serde(flatten)]
    pub job: Job,
    pub tasks: Vec<TaskView>,
}

/// A board with its nested jobs and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    #[serde(flatten)]
    pub board: Board,
    pub jobs: Vec<JobView>,
}

impl BoardView {
    /// Find the rendering of a job on this board.
    pub fn job(&self, job_id: i64) -> Option<&JobView> {
        self.jobs.iter().find(|j| j.job.id == job_id)
    }

    /// Whether a task is shown anywhere on this board.
    pub fn has_task(&self, task_id: i64) -> bool {
        self.jobs
            .iter()
            .any(|j| j.tasks.iter().any(|t| t.task.id == task_id))
    }
}

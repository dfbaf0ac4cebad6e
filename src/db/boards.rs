//! Board CRUD operations.

use super::{Database, normalize_description, normalize_title};
use crate::error::AppError;
use crate::types::{Board, MAX_BOARD_TITLE_LEN};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn board_from_row(row: &Row<'_>) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
    })
}

/// Get a board using an existing connection.
pub(crate) fn get_board_internal(conn: &Connection, board_id: i64) -> Result<Option<Board>> {
    let board = conn
        .query_row(
            "SELECT id, title, description FROM boards WHERE id = ?1",
            params![board_id],
            board_from_row,
        )
        .optional()?;
    Ok(board)
}

/// Get a board or fail with `BoardNotFound`.
pub(crate) fn require_board_internal(conn: &Connection, board_id: i64) -> Result<Board> {
    get_board_internal(conn, board_id)?
        .ok_or_else(|| AppError::board_not_found(board_id).into())
}

/// Insert a board using an existing connection.
pub(crate) fn insert_board_internal(
    conn: &Connection,
    title: &str,
    description: Option<&str>,
) -> Result<Board> {
    let title = normalize_title("title", title, MAX_BOARD_TITLE_LEN)?;
    let description = normalize_description(description);

    let exists = conn
        .query_row(
            "SELECT 1 FROM boards WHERE title = ?1",
            params![&title],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if exists {
        return Err(AppError::already_exists("Board", &title).into());
    }

    let id: i64 = conn.query_row(
        "INSERT INTO boards (title, description) VALUES (?1, ?2) RETURNING id",
        params![&title, &description],
        |row| row.get(0),
    )?;

    Ok(Board {
        id,
        title,
        description,
    })
}

impl Database {
    /// Create a board. Titles are unique.
    pub fn create_board(&self, title: &str, description: Option<&str>) -> Result<Board> {
        let board = self.with_tx(|tx| insert_board_internal(tx, title, description))?;
        tracing::info!(board_id = board.id, title = %board.title, "Created board");
        Ok(board)
    }

    /// Get a board by ID.
    pub fn get_board(&self, board_id: i64) -> Result<Option<Board>> {
        self.with_conn(|conn| get_board_internal(conn, board_id))
    }

    /// Get a board by ID, failing with `BoardNotFound` if absent.
    pub fn require_board(&self, board_id: i64) -> Result<Board> {
        self.with_conn(|conn| require_board_internal(conn, board_id))
    }

    /// Find a board by its unique title.
    pub fn find_board_by_title(&self, title: &str) -> Result<Option<Board>> {
        self.with_conn(|conn| {
            let board = conn
                .query_row(
                    "SELECT id, title, description FROM boards WHERE title = ?1",
                    params![title],
                    board_from_row,
                )
                .optional()?;
            Ok(board)
        })
    }

    /// List all boards in creation order.
    pub fn list_boards(&self) -> Result<Vec<Board>> {
        self.with_conn(|conn| list_boards_internal(conn))
    }
}

pub(crate) fn list_boards_internal(conn: &Connection) -> Result<Vec<Board>> {
    let mut stmt = conn.prepare("SELECT id, title, description FROM boards ORDER BY id")?;
    let boards = stmt
        .query_map([], board_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(boards)
}

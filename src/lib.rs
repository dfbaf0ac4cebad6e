//! Kanban board server library.
//!
//! Boards contain jobs, jobs contain prioritised tasks, and link tables let a
//! job's tasks be shown differently on each board. This module exports the
//! components used by the binary and the integration tests.

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod logging;
pub mod types;

//! Configuration for the kanban server.
//!
//! Settings are resolved from, lowest to highest precedence:
//! 1. **Defaults** - compiled in
//! 2. **Project** - `$CWD/kanban/config.yaml`
//! 3. **User** - `~/.kanban/config.yaml`
//! 4. **Environment** - `KANBAN_*` variables
//!
//! YAML tiers are merged field by field. An explicit file (`--config` or
//! `KANBAN_CONFIG_PATH`) replaces the file tiers; environment overrides still
//! apply on top of it.
//!
//! ## Environment Variables
//! - `KANBAN_CONFIG_PATH` - Explicit config file
//! - `KANBAN_DB_PATH` - Database path
//! - `KANBAN_HOST` - Listen address
//! - `KANBAN_PORT` - Listen port
//! - `KANBAN_MOVE_MODE` - `replace` or `retain`
//! - `KANBAN_USER_DIR` - User config dir (default: `~/.kanban`)
//! - `KANBAN_PROJECT_DIR` - Project config dir (default: `./kanban`)

mod loader;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, merge_values};
pub use types::*;

//! Configuration types.

use crate::types::MoveMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default port for the web server.
pub const DEFAULT_PORT: u16 = 5000;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub board: BoardConfig,
}

/// Server-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Address to listen on.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on (default: 5000).
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("kanban/kanban.db")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Board behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Whether a moved task keeps its link on the board it came from.
    #[serde(default)]
    pub move_mode: MoveMode,

    /// Seed priorities and default boards when the server starts.
    #[serde(default = "default_true")]
    pub seed_on_start: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            move_mode: MoveMode::default(),
            seed_on_start: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a single YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Ensure the database directory exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.server.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// The `host:port` string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.db_path, PathBuf::from("kanban/kanban.db"));
        assert_eq!(config.board.move_mode, MoveMode::Replace);
        assert!(config.board.seed_on_start);
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("board:\n  move_mode: retain\n").unwrap();
        assert_eq!(config.board.move_mode, MoveMode::Retain);
        assert!(config.board.seed_on_start);
        assert_eq!(config.server.port, DEFAULT_PORT);
    }

    #[test]
    fn load_reports_bad_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "board:\n  move_mode: sideways\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing config file"));
    }

    #[test]
    fn ensure_db_dir_creates_parent() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.server.db_path = temp.path().join("nested/dir/kanban.db");
        config.ensure_db_dir().unwrap();
        assert!(temp.path().join("nested/dir").is_dir());
    }
}

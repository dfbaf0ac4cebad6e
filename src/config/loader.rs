//! Configuration loader with tier-based merging.

use super::types::Config;
use crate::types::MoveMode;
use anyhow::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directories searched for `config.yaml`.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project-level config directory
    pub project_dir: Option<PathBuf>,
    /// User-level config directory
    pub user_dir: Option<PathBuf>,
    /// Explicit config file that replaces the directory tiers
    pub explicit_file: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// Discover configuration paths from environment and defaults.
    pub fn discover() -> Self {
        let user_dir = std::env::var("KANBAN_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".kanban")));

        let project_dir = std::env::var("KANBAN_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("kanban")));

        let explicit_file = std::env::var("KANBAN_CONFIG_PATH").ok().map(PathBuf::from);

        Self {
            project_dir,
            user_dir,
            explicit_file,
        }
    }

    /// Create paths with explicit directories.
    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
            explicit_file: None,
        }
    }

    /// Use a single explicit config file.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(file.into());
        self
    }
}

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: Config,
    /// Config files that contributed, lowest tier first
    sources: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Load configuration from all tiers, including the process environment.
    pub fn load(paths: ConfigPaths) -> Result<Self> {
        Self::load_with_env(paths, |key| std::env::var(key).ok())
    }

    /// Load configuration using `env` to look up override variables.
    pub fn load_with_env<F>(paths: ConfigPaths, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut sources = Vec::new();

        let mut config = if let Some(path) = &paths.explicit_file {
            sources.push(path.clone());
            Config::load(path)?
        } else {
            let mut merged = serde_json::to_value(Config::default())?;
            for dir in [&paths.project_dir, &paths.user_dir].into_iter().flatten() {
                let file = dir.join("config.yaml");
                if let Some(value) = read_yaml(&file)? {
                    merged = merge_values(merged, value);
                    sources.push(file);
                }
            }
            serde_json::from_value(merged)?
        };

        apply_env_overrides(&mut config, env);

        debug!(sources = ?sources, "Loaded configuration");
        Ok(Self { config, sources })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    /// Config files that were read, lowest precedence first.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

fn read_yaml(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    match serde_yaml::from_str::<Value>(&content) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(path = %path.display(), "Ignoring unparseable config file: {}", e);
            Ok(None)
        }
    }
}

/// Merge `overlay` onto `base`: objects merge key by key, anything else in
/// the overlay replaces the base value. A null overlay keeps the base.
pub fn merge_values(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

fn apply_env_overrides<F>(config: &mut Config, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(db_path) = env("KANBAN_DB_PATH") {
        config.server.db_path = PathBuf::from(db_path);
    }

    if let Some(host) = env("KANBAN_HOST") {
        config.server.host = host;
    }

    if let Some(port) = env("KANBAN_PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!(value = %port, "Ignoring invalid KANBAN_PORT"),
        }
    }

    if let Some(mode) = env("KANBAN_MOVE_MODE") {
        match mode.parse::<MoveMode>() {
            Ok(mode) => config.board.move_mode = mode,
            Err(e) => warn!("Ignoring KANBAN_MOVE_MODE: {}", e),
        }
    }
}

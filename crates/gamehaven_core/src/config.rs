//! Application configuration.
//!
//! # Responsibility
//! - Describe where the store, session and seed marker live.
//! - Load overrides from an optional JSON file; every field has a default.

use crate::model::game::DEFAULT_LOW_STOCK_THRESHOLD;
use crate::store::DEFAULT_CHANGE_CAPACITY;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE: &str = "gamehaven.sqlite3";
const DEFAULT_SESSION_FILE: &str = "user_session.json";
const DEFAULT_SEED_MARKER_FILE: &str = "init_db.json";

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    RelativeDataDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
            Self::RelativeDataDir(path) => {
                write!(f, "data_dir must be an absolute path, got `{}`", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::RelativeDataDir(_) => None,
        }
    }
}

/// Runtime configuration for one application instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Absolute directory holding every file below.
    pub data_dir: PathBuf,
    pub db_file: String,
    pub session_file: String,
    pub seed_marker_file: String,
    /// Seeds demo users/games on first run.
    pub seed_demo_data: bool,
    /// Log level passed to `init_logging`; `None` keeps the build default.
    pub log_level: Option<String>,
    /// Log directory; defaults to `<data_dir>/logs`.
    pub log_dir: Option<PathBuf>,
    pub low_stock_threshold: i64,
    pub change_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            db_file: DEFAULT_DB_FILE.to_string(),
            session_file: DEFAULT_SESSION_FILE.to_string(),
            seed_marker_file: DEFAULT_SEED_MARKER_FILE.to_string(),
            seed_demo_data: true,
            log_level: None,
            log_dir: None,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            change_capacity: DEFAULT_CHANGE_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Defaults rooted at `data_dir`.
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Reads a JSON config file; missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_slice(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.data_dir.is_absolute() {
            return Err(ConfigError::RelativeDataDir(self.data_dir.clone()));
        }
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(&self.session_file)
    }

    pub fn seed_marker_path(&self) -> PathBuf {
        self.data_dir.join(&self.seed_marker_file)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use std::path::PathBuf;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gamehaven.json");
        let data_dir = dir.path().join("data");
        std::fs::write(
            &path,
            format!(
                r#"{{"data_dir": {:?}, "low_stock_threshold": 3}}"#,
                data_dir.to_str().unwrap()
            ),
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.low_stock_threshold, 3);
        assert_eq!(config.db_path(), data_dir.join("gamehaven.sqlite3"));
        assert_eq!(config.session_path(), data_dir.join("user_session.json"));
        assert!(config.seed_demo_data);
    }

    #[test]
    fn relative_data_dir_is_rejected() {
        let config = AppConfig::for_data_dir(PathBuf::from("relative/data"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RelativeDataDir(_))
        ));
    }
}

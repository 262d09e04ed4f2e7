//! Configuration loading and data directory resolution.
//!
//! `config.toml` lives in `<config dir>/sync-operator/`:
//!
//! ```toml
//! data_dir = "/srv/plans"
//! storage_key = "SyncOperator_v1"
//! seed_demo_data = true
//! export_dir = "/home/me/Downloads"
//! ```
//!
//! Every key is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};
use crate::persistence::STORAGE_KEY;

/// Directory name under the platform config and data dirs.
pub const APP_DIR: &str = "sync-operator";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SYNC_OPERATOR_DATA_DIR";

/// Config file name inside the app config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Planner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Where the plan store lives.
    pub data_dir: Option<PathBuf>,
    /// Key (file stem) of the stored plan.
    pub storage_key: String,
    /// Start from the demo plan when nothing is stored.
    pub seed_demo_data: bool,
    /// Target directory for exports.
    pub export_dir: Option<PathBuf>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: STORAGE_KEY.to_string(),
            seed_demo_data: true,
            export_dir: None,
        }
    }
}

impl PlannerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Reads `path`, or the user config file when `path` is `None`.
    ///
    /// A missing user config file yields the defaults. An explicitly given
    /// file must exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Data directory by priority: CLI argument, environment variable,
    /// config file, platform default.
    pub fn resolve_data_dir(&self, cli_arg: Option<&Path>) -> Result<PathBuf> {
        let env = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        self.pick_data_dir(cli_arg, env)
    }

    fn pick_data_dir(&self, cli_arg: Option<&Path>, env: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = cli_arg {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = env.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(path);
        }
        if let Some(path) = &self.data_dir {
            return Ok(path.clone());
        }
        default_data_dir()
            .ok_or_else(|| Error::Config("could not determine a data directory".to_string()))
    }

    /// Export directory: configured, else the download dir, else `data_dir`.
    pub fn resolve_export_dir(&self, data_dir: &Path) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| data_dir.to_path_buf())
    }
}

/// `<config dir>/sync-operator/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

/// `<local data dir>/sync-operator`.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.storage_key, "SyncOperator_v1");
        assert!(config.seed_demo_data);
        assert_eq!(PlannerConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_parse_partial_file() {
        let config = PlannerConfig::from_toml_str(
            r#"
            data_dir = "/srv/plans"
            seed_demo_data = false
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/plans")));
        assert!(!config.seed_demo_data);
        assert_eq!(config.storage_key, STORAGE_KEY);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            PlannerConfig::from_toml_str("seed_demo_data = \"yes\""),
            Err(Error::Toml(_))
        ));
        assert!(matches!(
            PlannerConfig::load(Path::new("/no/such/config.toml")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "storage_key = \"shop_floor\"\n").unwrap();

        let config = PlannerConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.storage_key, "shop_floor");
    }

    #[test]
    fn test_data_dir_priority() {
        let config = PlannerConfig {
            data_dir: Some(PathBuf::from("/from/config")),
            ..PlannerConfig::default()
        };
        let cli = Path::new("/from/cli");
        let env = Some(PathBuf::from("/from/env"));

        assert_eq!(
            config.pick_data_dir(Some(cli), env.clone()).unwrap(),
            PathBuf::from("/from/cli")
        );
        assert_eq!(
            config.pick_data_dir(None, env).unwrap(),
            PathBuf::from("/from/env")
        );
        assert_eq!(
            config.pick_data_dir(None, Some(PathBuf::new())).unwrap(),
            PathBuf::from("/from/config")
        );
    }

    #[test]
    fn test_export_dir_prefers_config() {
        let config = PlannerConfig {
            export_dir: Some(PathBuf::from("/exports")),
            ..PlannerConfig::default()
        };
        assert_eq!(
            config.resolve_export_dir(Path::new("/data")),
            PathBuf::from("/exports")
        );
    }
}

use crate::error::{CarrelError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for carrel, stored in config.json next to the library
/// data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarrelConfig {
    /// Extensions considered when importing directories.
    #[serde(default = "default_import_extensions")]
    pub import_extensions: Vec<String>,

    /// How many timestamped backups of library.json to keep around.
    #[serde(default = "default_backup_keep")]
    pub backup_keep: usize,

    /// Depth of the recently-viewed history.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_import_extensions() -> Vec<String> {
    [".txt", ".md", ".pdf", ".mp3", ".wav", ".mp4", ".avi", ".mov"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_backup_keep() -> usize {
    5
}

fn default_recent_limit() -> usize {
    crate::recent::DEFAULT_LIMIT
}

impl Default for CarrelConfig {
    fn default() -> Self {
        Self {
            import_extensions: default_import_extensions(),
            backup_keep: default_backup_keep(),
            recent_limit: default_recent_limit(),
        }
    }
}

impl CarrelConfig {
    /// Load from `dir/config.json`; a missing file means defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(CarrelError::Io)?;
        let config = serde_json::from_str(&content).map_err(CarrelError::Serialization)?;
        Ok(config)
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(CarrelError::Io)?;
        let path = dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(CarrelError::Serialization)?;
        fs::write(path, content).map_err(CarrelError::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CarrelConfig::load(dir.path()).unwrap();
        assert_eq!(config, CarrelConfig::default());
        assert_eq!(config.backup_keep, 5);
        assert_eq!(config.recent_limit, 20);
        assert!(config.import_extensions.contains(&".pdf".to_string()));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let config = CarrelConfig {
            import_extensions: vec![".md".into()],
            backup_keep: 2,
            recent_limit: 7,
        };
        config.save(dir.path()).unwrap();
        assert_eq!(CarrelConfig::load(dir.path()).unwrap(), config);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), r#"{"backup_keep": 9}"#).unwrap();
        let config = CarrelConfig::load(dir.path()).unwrap();
        assert_eq!(config.backup_keep, 9);
        assert_eq!(config.recent_limit, 20);
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// `~/.notedeck`, or the current directory when there is no home
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".notedeck"))
        .unwrap_or_else(|| PathBuf::from(".notedeck"))
}

pub fn default_config_path() -> PathBuf {
    app_dir().join("config.toml")
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// Parent of every user's workspace directory
    pub base_dir: PathBuf,
    pub enable_encryption: bool,
    /// Environment variable holding the encryption passphrase
    pub passphrase_env: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_dir: app_dir().join("data"),
            enable_encryption: false,
            passphrase_env: "NOTEDECK_PASSPHRASE".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: app_dir().join("notedeck.log"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
    pub show_sidebar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            show_sidebar: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub logging: LoggingConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Workspace directory of one user
    pub fn workspace_dir(&self, username: &str) -> PathBuf {
        self.data.base_dir.join(username)
    }
}

/// Load the config at `path`, writing the defaults there first if it does
/// not exist yet.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        let config = Config::default();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }
        let toml = toml::to_string(&config).context("Failed to serialize default config")?;
        fs::write(path, toml)
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;
        return Ok(config);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_written_when_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = load_config(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[data]\nbase_dir = \"/srv/notes\"\n\n[ui]\ntick_rate_ms = 100\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.data.base_dir, PathBuf::from("/srv/notes"));
        assert_eq!(config.ui.tick_rate_ms, 100);
        assert!(config.ui.show_sidebar);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.workspace_dir("alice"), PathBuf::from("/srv/notes/alice"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[data\nbase_dir = ").unwrap();
        assert!(load_config(&path).is_err());
    }
}

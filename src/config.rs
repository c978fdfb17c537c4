use anyhow::{Context, Result};
use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::calendar::DEFAULT_TIME_ZONE;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// IANA zone emitted events are placed in
    pub time_zone: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_SERVER_ADDRESS.to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&get_config_path()?)
    }

    /// Load from `path`, writing the defaults there if it does not exist yet
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_config = Config::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// The configured calendar zone, validated
    pub fn time_zone(&self) -> Result<Tz> {
        self.calendar
            .time_zone
            .parse::<Tz>()
            .map_err(|_| anyhow::anyhow!("Unknown time zone '{}'", self.calendar.time_zone))
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "voicecal", "voicecal")
        .context("Failed to determine config directory")?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.calendar.time_zone, "America/Toronto");
        assert_eq!(config.server.address, "127.0.0.1:3000");
        assert_eq!(config.time_zone().unwrap(), chrono_tz::America::Toronto);
    }

    #[test]
    fn test_config_save_load() -> Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.calendar.time_zone = "Europe/Berlin".to_string();
        config.save_to(&config_path)?;

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);
        assert_eq!(loaded.time_zone()?, chrono_tz::Europe::Berlin);

        Ok(())
    }

    #[test]
    fn test_missing_file_writes_defaults() -> Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("config.toml");

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, Config::default());
        assert!(config_path.exists());

        Ok(())
    }

    #[test]
    fn test_partial_file_fills_sections() -> Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[server]\naddress = \"0.0.0.0:8080\"\n")?;

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded.server.address, "0.0.0.0:8080");
        assert_eq!(loaded.calendar, CalendarConfig::default());

        Ok(())
    }

    #[test]
    fn test_unknown_time_zone() {
        let mut config = Config::default();
        config.calendar.time_zone = "Mars/Olympus".to_string();
        assert!(config.time_zone().is_err());
    }
}

//! Dashboard configuration
//!
//! Read from an optional `dashboard.yaml` in the working directory. Every
//! field has a default, so a missing file is not an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::data::filter::{YearRange, DEFAULT_MAX_YEAR, DEFAULT_MIN_YEAR};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8050;

/// Default dataset location, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "games.csv";

/// Configuration file name
pub const CONFIG_FILENAME: &str = "dashboard.yaml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Games table to load at startup
    pub data_path: PathBuf,
    /// Port for the web dashboard (127.0.0.1 only)
    pub port: u16,
    /// Limits of the year range control
    pub year_bounds: YearRange,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            port: DEFAULT_PORT,
            year_bounds: YearRange::new(DEFAULT_MIN_YEAR, DEFAULT_MAX_YEAR),
        }
    }
}

impl DashboardConfig {
    /// Load the configuration from `config_dir`.
    ///
    /// Returns the defaults when the file does not exist or cannot be parsed.
    pub fn load(config_dir: &Path) -> Self {
        let config_path = config_dir.join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Self::default();
        }

        let parsed = fs::read_to_string(&config_path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_yaml::from_str::<Self>(&content).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(mut config) => {
                if config.data_path.is_relative() {
                    config.data_path = config_dir.join(&config.data_path);
                }
                config
            }
            Err(e) => {
                log::warn!(
                    "Ignoring {}: {e}; using default configuration",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Ports below 1024 are privileged and rejected; 0 asks the OS for a
    /// free port.
    pub fn validate_port(port: u16) -> Result<(), String> {
        if port != 0 && port < 1024 {
            return Err("Port must be >= 1024 (non-privileged ports)".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.data_path, PathBuf::from("games.csv"));
        assert_eq!(config.year_bounds, YearRange::new(2000, 2022));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let dir = tempdir().unwrap();
        assert_eq!(DashboardConfig::load(dir.path()), DashboardConfig::default());
    }

    #[test]
    fn test_load_full_config() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            "data_path: other.parquet\nport: 9000\nyear_bounds:\n  min: 1990\n  max: 2016\n",
        )
        .unwrap();

        let config = DashboardConfig::load(dir.path());
        assert_eq!(config.data_path, dir.path().join("other.parquet"));
        assert_eq!(config.port, 9000);
        assert_eq!(config.year_bounds, YearRange::new(1990, 2016));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "port: 9100\n").unwrap();

        let config = DashboardConfig::load(dir.path());
        assert_eq!(config.port, 9100);
        assert_eq!(config.year_bounds, YearRange::new(2000, 2022));
        assert_eq!(config.data_path, dir.path().join(DEFAULT_DATA_PATH));
    }

    #[test]
    fn test_unparsable_config_falls_back() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "port: [not a number\n").unwrap();
        assert_eq!(DashboardConfig::load(dir.path()), DashboardConfig::default());
    }

    #[test]
    fn test_validate_port() {
        assert!(DashboardConfig::validate_port(0).is_ok());
        assert!(DashboardConfig::validate_port(1024).is_ok());
        assert!(DashboardConfig::validate_port(8050).is_ok());
        assert!(DashboardConfig::validate_port(1023).is_err());
        assert!(DashboardConfig::validate_port(80).is_err());
    }
}

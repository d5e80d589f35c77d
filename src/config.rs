//! Configuration Module
//! Optional TOML settings for the forecast horizon and input lookup.

use crate::discovery::DEFAULT_DATA_FILE;
use crate::stats::{DEFAULT_TARGET_YEAR, DEFAULT_TREND_POINTS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the data directory.
pub const CONFIG_FILE_NAME: &str = "presale_trend.toml";

const TARGET_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2200;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Year to project to
    pub target_year: Option<i32>,

    /// Points on the trend line
    pub trend_points: Option<usize>,

    /// File name tried before any other CSV in the data directory
    pub default_file: Option<String>,

    /// Directory searched for input files
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_year: Some(DEFAULT_TARGET_YEAR),
            trend_points: Some(DEFAULT_TREND_POINTS),
            default_file: Some(DEFAULT_DATA_FILE.to_string()),
            data_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from file; unset fields keep their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::default().merge(parsed))
    }

    /// `presale_trend.toml` in `dir` when present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Fields set in `other` override ours.
    pub fn merge(self, other: Config) -> Self {
        Self {
            target_year: other.target_year.or(self.target_year),
            trend_points: other.trend_points.or(self.trend_points),
            default_file: other.default_file.or(self.default_file),
            data_dir: other.data_dir.or(self.data_dir),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !TARGET_YEAR_RANGE.contains(&self.target_year()) {
            return Err(ConfigError::Invalid(format!(
                "target_year {} outside {}..={}",
                self.target_year(),
                TARGET_YEAR_RANGE.start(),
                TARGET_YEAR_RANGE.end()
            )));
        }
        if self.trend_points() < 2 {
            return Err(ConfigError::Invalid(format!(
                "trend_points must be at least 2 (got {})",
                self.trend_points()
            )));
        }
        Ok(())
    }

    pub fn target_year(&self) -> i32 {
        self.target_year.unwrap_or(DEFAULT_TARGET_YEAR)
    }

    pub fn trend_points(&self) -> usize {
        self.trend_points.unwrap_or(DEFAULT_TREND_POINTS)
    }

    pub fn default_file(&self) -> &str {
        self.default_file.as_deref().unwrap_or(DEFAULT_DATA_FILE)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_constants() {
        let config = Config::default();
        assert_eq!(config.target_year(), 2026);
        assert_eq!(config.trend_points(), 50);
        assert_eq!(config.default_file(), "한국부동산 가격 데이터.csv");
        assert_eq!(config.data_dir(), PathBuf::from("."));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "target_year = 2030\n").unwrap();
        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.target_year(), 2030);
        assert_eq!(config.trend_points(), 50);
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::discover(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn rejects_bad_values() {
        let config = Config {
            trend_points: Some(1),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = Config {
            target_year: Some(9999),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "target_year = \"soon\"").unwrap();
        assert!(matches!(
            Config::load_from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}

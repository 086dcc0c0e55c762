//! User configuration
//!
//! Read from `<config_home>/yieldline/config.toml` unless a path is given.
//! Every field is optional.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buckets::BucketKey;
use crate::error::ChartError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Bucket used when none is given on the command line
    pub default_bucket: String,
    /// Trailing window applied to USD columns; 0 disables smoothing
    pub moving_average_window: usize,
    pub include_debug_breakdown: bool,
    /// Used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_bucket: BucketKey::OneDayOneMonth.as_str().to_string(),
            moving_average_window: 0,
            include_debug_breakdown: false,
            log_filter: "warn".to_string(),
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        dir_spec::config_home().map(|dir| dir.join("yieldline").join("config.toml"))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content).context("invalid config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !required && !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to load config file {}", path.display()))
    }

    pub fn bucket(&self) -> Result<BucketKey, ChartError> {
        self.default_bucket.parse()
    }

    fn validate(&self) -> Result<(), ChartError> {
        self.bucket().map_err(|_| {
            ChartError::InvalidConfig(format!("unknown default_bucket '{}'", self.default_bucket))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bucket().unwrap(), BucketKey::OneDayOneMonth);
    }

    #[test]
    fn test_partial_file_overrides_fields() {
        let config = AppConfig::from_toml_str(
            r#"
            default_bucket = "1h_1w"
            moving_average_window = 7
            "#,
        )
        .unwrap();
        assert_eq!(config.bucket().unwrap(), BucketKey::OneHourOneWeek);
        assert_eq!(config.moving_average_window, 7);
        assert!(!config.include_debug_breakdown);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_unknown_bucket_is_rejected() {
        let err = AppConfig::from_toml_str(r#"default_bucket = "1w_1d""#).unwrap_err();
        assert!(format!("{:?}", err).contains("unknown default_bucket"));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "include_debug_breakdown = true").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert!(config.include_debug_breakdown);
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("nope.toml")));
        assert!(result.is_err());
    }
}

//! Configuration management for DeskSearch
//!
//! Settings are read from a TOML file. Every section is optional and falls
//! back to its defaults; command-line flags are applied on top by the CLI.

use crate::query::IdCoercion;
use crate::render::DEFAULT_LABEL_WIDTH;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

/// DeskSearch configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Where the collections live
    pub data: DataSettings,
    /// Query behaviour
    pub query: QuerySettings,
    /// Result formatting
    pub output: OutputSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory holding users.json, tickets.json and organizations.json
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    /// How text for `_id` fields is turned into integers
    pub id_coercion: IdCoercion,
    /// Queries at least this slow are logged as warnings (0 disables)
    pub slow_query_threshold_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Column width labels are padded to
    pub label_width: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log filter, overridden by RUST_LOG when set. Either a bare level
    /// (`warn`) or comma-separated directives (`desksearch_core=debug,warn`)
    pub level: String,
    /// Emit JSON lines instead of compact text
    pub json: bool,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            id_coercion: IdCoercion::Strict,
            slow_query_threshold_ms: 100,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            label_width: DEFAULT_LABEL_WIDTH,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl SearchConfig {
    /// Load configuration, returning defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: SearchConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration as pretty TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.data.data_dir.as_os_str().is_empty() {
            bail!("data.data_dir must not be empty");
        }

        if self.output.label_width == 0 {
            bail!("output.label_width must be greater than 0");
        }

        validate_log_filter(&self.logging.level)
    }

    pub fn slow_query_threshold(&self) -> Duration {
        Duration::from_millis(self.query.slow_query_threshold_ms)
    }
}

/// Accept anything `EnvFilter` parses, as long as every directive ends in a
/// known level. A bare word is otherwise read as a target name.
fn validate_log_filter(filter: &str) -> Result<()> {
    EnvFilter::try_new(filter)
        .with_context(|| format!("logging.level '{}' is not a valid filter", filter))?;

    for directive in filter.split(',').map(str::trim).filter(|d| !d.is_empty()) {
        let level = directive
            .rsplit_once('=')
            .map_or(directive, |(_, level)| level)
            .to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            bail!(
                "logging.level directive '{}' does not end in one of {}",
                directive,
                LOG_LEVELS.join(", ")
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = SearchConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, SearchConfig::default());
        assert_eq!(config.query.id_coercion, IdCoercion::Strict);
        assert_eq!(config.output.label_width, 20);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("desksearch.toml");
        std::fs::write(
            &path,
            "[query]\nid_coercion = \"legacy\"\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = SearchConfig::load(&path).unwrap();
        assert_eq!(config.query.id_coercion, IdCoercion::Legacy);
        assert_eq!(config.query.slow_query_threshold_ms, 100);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.data.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("desksearch.toml");

        let mut config = SearchConfig::default();
        config.data.data_dir = PathBuf::from("/srv/desk");
        config.output.label_width = 24;
        config.logging.json = true;
        config.save(&path).unwrap();

        assert_eq!(SearchConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_validation() {
        let mut config = SearchConfig::default();
        assert!(config.validate().is_ok());

        config.output.label_width = 0;
        assert!(config.validate().is_err());

        let mut config = SearchConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "desksearch_core=loud".to_string();
        assert!(config.validate().is_err());

        let mut config = SearchConfig::default();
        config.data.data_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_filter_directives_accepted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("desksearch.toml");
        std::fs::write(
            &path,
            "[logging]\nlevel = \"desksearch_core=debug,slow_query=warn,error\"\n",
        )
        .unwrap();

        let config = SearchConfig::load(&path).unwrap();
        assert_eq!(config.logging.level, "desksearch_core=debug,slow_query=warn,error");

        let mut config = SearchConfig::default();
        config.logging.level = "INFO".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("desksearch.toml");
        std::fs::write(&path, "[output]\nlabel_width = 0\n").unwrap();
        assert!(SearchConfig::load(&path).is_err());

        std::fs::write(&path, "[query]\nid_coercion = \"lenient\"\n").unwrap();
        assert!(SearchConfig::load(&path).is_err());
    }
}

//! Configuration loading for gregor-router.
//!
//! Configuration is loaded from a TOML file. Every field has a default, so
//! an empty file (or a missing `[router]` section) is valid.

use gregor_core::{Platform, DEFAULT_FIREHOSE_SYSTEMS, DEFAULT_NEW_EXPLODING_THRESHOLD_MS};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Router configuration.
    #[serde(default)]
    pub router: RouterConfig,
}

/// Router configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouterConfig {
    /// Runtime kind (default: desktop).
    #[serde(default)]
    pub platform: Platform,
    /// OOBM systems to register the firehose for (default: git, kbfs.favorites).
    #[serde(default = "default_firehose_systems")]
    pub firehose_systems: Vec<String>,
    /// Age in ms after which the exploding acknowledgement is stale (default: 3 days).
    #[serde(default = "default_exploding_new_threshold_ms")]
    pub exploding_new_threshold_ms: i64,
}

fn default_firehose_systems() -> Vec<String> {
    DEFAULT_FIREHOSE_SYSTEMS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_exploding_new_threshold_ms() -> i64 {
    DEFAULT_NEW_EXPLODING_THRESHOLD_MS
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            firehose_systems: default_firehose_systems(),
            exploding_new_threshold_ms: default_exploding_new_threshold_ms(),
        }
    }
}

impl RouterConfig {
    /// Set the platform.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Set the exploding acknowledgement threshold.
    pub fn with_exploding_threshold_ms(mut self, threshold_ms: i64) -> Self {
        self.exploding_new_threshold_ms = threshold_ms;
        self
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.router.platform, Platform::Desktop);
        assert_eq!(config.router.firehose_systems, vec!["git", "kbfs.favorites"]);
        assert_eq!(
            config.router.exploding_new_threshold_ms,
            3 * 24 * 60 * 60 * 1000
        );
    }

    #[test]
    fn config_from_toml_string() {
        let toml = r#"
[router]
platform = "mobile"
firehose_systems = ["git", "kbfs.favorites", "team.clkr"]
exploding_new_threshold_ms = 60000
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.router.platform, Platform::Mobile);
        assert_eq!(config.router.firehose_systems.len(), 3);
        assert_eq!(config.router.exploding_new_threshold_ms, 60000);
    }

    #[test]
    fn config_missing_fields_use_defaults() {
        let config: Config = toml::from_str("[router]\n").unwrap();
        assert_eq!(config.router, RouterConfig::default());

        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.router, RouterConfig::default());
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[router]\nplatform = \"mobile\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.router.platform, Platform::Mobile);
    }

    #[test]
    fn from_file_reports_missing_file() {
        let result = Config::from_file(Path::new("/nonexistent/gregor.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn from_file_reports_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[router]\nplatform = \"toaster\"").unwrap();

        let result = Config::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}

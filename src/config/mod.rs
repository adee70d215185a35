//! Configuration system for coordr.
//!
//! One YAML file with a section per coordinator. Every field has a default
//! matching the classic form of each problem, so an empty file (or none) runs
//! the standard scenarios.
//!
//! Search order:
//! 1. Explicit path if provided
//! 2. .coordr.yml in current directory
//! 3. ~/.config/coordr/coordr.yml
//! 4. Defaults

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use self::pipeline::PipelineConfig;
pub use self::ring::{DEFAULT_AGENTS, RingConfig};
pub use self::service::ServiceConfig;

mod pipeline;
mod ring;
mod service;

/// Top-level configuration for all coordinators.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Resource ring settings.
    pub ring: RingConfig,

    /// Bounded pipeline settings.
    pub pipeline: PipelineConfig,

    /// Bounded service settings.
    pub service: ServiceConfig,
}

impl Config {
    /// Load configuration with fallback chain.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // Explicit path takes precedence
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project config
        let project_config = PathBuf::from(".coordr.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .coordr.yml");
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load .coordr.yml: {}", e);
                }
            }
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("coordr").join("coordr.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.ring.validate().context("ring section")?;
        self.pipeline.validate().context("pipeline section")?;
        self.service.validate().context("service section")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ring.agents.len(), 5);
        assert_eq!(config.ring.cycles, 3);
        assert_eq!(config.pipeline.capacity, 5);
        assert_eq!(config.pipeline.failure_threshold, 2);
        assert_eq!(config.service.waiting_capacity, 5);
        assert_eq!(config.service.expected_total, 10);
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = Config {
            pipeline: PipelineConfig {
                capacity: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
ring:
  cycles: 1
  use-ms: 10
pipeline:
  failure-threshold: 4
  consumers: 3
service:
  server-name: Corner Shop
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.ring.cycles, 1);
        assert_eq!(config.ring.use_ms, 10);
        assert_eq!(config.pipeline.failure_threshold, 4);
        assert_eq!(config.pipeline.consumers, 3);
        assert_eq!(config.service.server_name, "Corner Shop");
        // Other fields should have defaults
        assert_eq!(config.ring.idle_ms, 2000);
        assert_eq!(config.service.expected_total, 10);
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "service:\n  expected-total: 4").unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.service.expected_total, 4);
        assert_eq!(config.pipeline, PipelineConfig::default());
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let path = PathBuf::from("/nonexistent/coordr.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ring: [not, a, map").unwrap();
        assert!(Config::load(Some(&file.path().to_path_buf())).is_err());
    }
}

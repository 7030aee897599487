//! Application configuration structures.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::validation::ConfigError;
use crate::sweep::SweepConfig;
use crate::targets::EmptyPolicy;

// =============================================================================
// Server Configuration
// =============================================================================

/// Results API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address (default: "0.0.0.0").
    pub bind: String,

    /// Server port (default: 8080).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

// =============================================================================
// Target Source Configuration
// =============================================================================

/// Where targets come from when none are given on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Newline-delimited target file.
    pub file: Option<PathBuf>,

    /// What to do when neither a file nor arguments supply targets
    /// (default: generate).
    pub on_empty: EmptyPolicy,
}

// =============================================================================
// Application Configuration
// =============================================================================

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Sweep tuning.
    pub sweep: SweepConfig,

    /// Results API server configuration.
    pub server: ServerConfig,

    /// Target source.
    pub targets: TargetsConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, parsed, or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if any field is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.bind.parse::<IpAddr>().map_err(|_| {
            ConfigError::ValidationError(format!(
                "invalid server bind address: '{}'",
                self.server.bind
            ))
        })?;

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server port must be non-zero".to_string(),
            ));
        }

        self.sweep.validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_app_config_default_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sweep.workers, 100);
        assert_eq!(config.targets.on_empty, EmptyPolicy::Generate);
        assert!(config.targets.file.is_none());
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = AppConfig::from_yaml(
            r#"
sweep:
  workers: 16
  timeout: 250ms
server:
  port: 9090
targets:
  file: hosts.txt
  on_empty: fail
"#,
        )
        .unwrap();

        assert_eq!(config.sweep.workers, 16);
        assert_eq!(config.sweep.timeout, Duration::from_millis(250));
        assert_eq!(config.sweep.count, 1);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.targets.file, Some(PathBuf::from("hosts.txt")));
        assert_eq!(config.targets.on_empty, EmptyPolicy::Fail);
    }

    #[test]
    fn test_from_yaml_empty_document() {
        let config = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_validation_invalid_port() {
        let config = AppConfig {
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 0,
            },
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_invalid_bind_address() {
        let config = AppConfig {
            server: ServerConfig {
                bind: "not-an-ip".to_string(),
                port: 8080,
            },
            ..Default::default()
        };

        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("invalid server bind address")
        );
    }

    #[test]
    fn test_config_validation_zero_workers() {
        let yaml = "sweep:\n  workers: 0\n";
        let err = AppConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("workers"));
    }

    #[test]
    fn test_load_sample_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/pingsweep.yaml");
        let config = AppConfig::load(path).unwrap();
        assert_eq!(config.sweep.workers, 100);
        assert_eq!(config.sweep.timeout, Duration::from_secs(1));
        assert_eq!(config.server.port, 8080);
        assert!(config.targets.file.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = AppConfig::load("/nonexistent/pingsweep.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}

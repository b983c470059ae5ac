//! Configuration file loading
//!
//! Reads the machine configuration from disk, falling back to the embedded
//! defaults when the file is absent.

use std::io;
use std::path::{Path, PathBuf};

use lockbreaker_core::config::{ConfigIssue, MachineConfig};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Default configuration compiled into the binary
pub const EMBEDDED_CONFIG: &str = include_str!("../../machine.toml");

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File exists but could not be read
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// TOML syntax or schema error
    #[error("failed to parse {origin}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
    /// Parsed but violates a machine constraint
    #[error("invalid configuration: {0}")]
    Invalid(ConfigIssue),
}

/// External slip check command
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SlipCheckConfig {
    /// Program and arguments; empty disables the check
    pub command: Vec<String>,
    /// Trimmed stdout that means the dial is where it should be
    pub expected: String,
}

impl Default for SlipCheckConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            expected: "0".to_string(),
        }
    }
}

/// Everything the firmware reads from the configuration file
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct FirmwareConfig {
    /// Machine parameters shared with the core
    #[serde(flatten)]
    pub machine: MachineConfig,
    /// Slip check command
    pub slip_check: SlipCheckConfig,
}

impl FirmwareConfig {
    /// Check the machine constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.machine.validate().map_err(ConfigError::Invalid)
    }
}

/// Parse and validate a TOML document; missing keys take their defaults
fn parse_config(text: &str, origin: &str) -> Result<FirmwareConfig, ConfigError> {
    let config: FirmwareConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
        origin: origin.to_string(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Load the configuration at `path`, or the embedded one if it does not exist
pub fn load(path: &Path) -> Result<FirmwareConfig, ConfigError> {
    let config = match std::fs::read_to_string(path) {
        Ok(text) => {
            info!(path = %path.display(), "loading configuration");
            parse_config(&text, &path.display().to_string())?
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no configuration file, using embedded defaults");
            parse_config(EMBEDDED_CONFIG, "embedded machine.toml")?
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    log_config_summary(&config);
    Ok(config)
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &FirmwareConfig) {
    let machine = &config.machine;
    debug!(
        steps_per_number = machine.dial.steps_per_number,
        reset_turns = machine.dial.reset_turns,
        "dial"
    );
    debug!(
        threshold_x10 = machine.probe.classifier.threshold_x10,
        adc_channel = machine.probe.adc_channel,
        "probe"
    );
    debug!(
        settle_ms = machine.settle.total_ms(),
        slip_check = !config.slip_check.command.is_empty(),
        "timing"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = parse_config(EMBEDDED_CONFIG, "embedded").unwrap();
        assert_eq!(config.machine, MachineConfig::default());
        assert!(config.slip_check.command.is_empty());
        assert_eq!(config.slip_check.expected, "0");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
            [dial]
            steps_per_number = 10

            [slip_check]
            command = ["read-dial", "--camera", "0"]
            "#,
            "partial",
        )
        .unwrap();

        assert_eq!(config.machine.dial.steps_per_number, 10);
        assert_eq!(config.machine.dial.reset_turns, 3);
        assert_eq!(config.machine.pins.step, 17);
        assert_eq!(config.slip_check.command.len(), 3);
        assert_eq!(config.slip_check.expected, "0");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = parse_config("[dial]\nreset_turns = 1\n", "test").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ConfigIssue::DialGeometry)));

        let err = parse_config("[pins]\ndir = 17\n", "test").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ConfigIssue::PinConflict)));
    }

    #[test]
    fn test_syntax_error_reported() {
        let err = parse_config("[dial\n", "test").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[probe.classifier]\nthreshold_x10 = 1500").unwrap();

        let config = load(file.path()).unwrap();
        assert_eq!(config.machine.probe.classifier.threshold_x10, 1500);
    }

    #[test]
    fn test_missing_file_uses_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.machine, MachineConfig::default());
    }

    #[test]
    fn test_directory_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

//! Dial slip check through an external command
//!
//! The camera and OCR live outside this program. The configured command
//! prints the number it reads under the dial index; anything other than the
//! expected text means the dial has slipped against the stepper.

use std::process::{Command, Stdio};

use lockbreaker_core::traits::SlipCheck;
use tracing::{debug, warn};

use crate::config::SlipCheckConfig;

/// Slip check that runs a command and compares its output
#[derive(Debug, Clone)]
pub struct CommandSlipCheck {
    program: Option<String>,
    args: Vec<String>,
    expected: String,
}

impl CommandSlipCheck {
    /// First element of `command` is the program, the rest its arguments;
    /// an empty command disables the check
    pub fn new(config: &SlipCheckConfig) -> Self {
        let mut parts = config.command.iter().cloned();
        Self {
            program: parts.next(),
            args: parts.collect(),
            expected: config.expected.trim().to_string(),
        }
    }

    /// False when no command is configured
    pub fn is_enabled(&self) -> bool {
        self.program.is_some()
    }
}

impl SlipCheck for CommandSlipCheck {
    fn anomaly_detected(&mut self) -> bool {
        let Some(program) = &self.program else {
            return false;
        };

        let output = match Command::new(program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                warn!(%program, error = %e, "slip check could not run");
                return true;
            }
        };

        if !output.status.success() {
            warn!(%program, status = %output.status, "slip check failed");
            return true;
        }

        let seen = String::from_utf8_lossy(&output.stdout);
        let seen = seen.trim();
        if seen == self.expected {
            debug!(seen, "slip check passed");
            false
        } else {
            warn!(seen, expected = %self.expected, "dial slip detected");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(script: &str) -> CommandSlipCheck {
        CommandSlipCheck::new(&SlipCheckConfig {
            command: vec!["sh".into(), "-c".into(), script.into()],
            expected: "0".into(),
        })
    }

    #[test]
    fn test_disabled_never_fires() {
        let mut check = CommandSlipCheck::new(&SlipCheckConfig::default());
        assert!(!check.is_enabled());
        assert!(!check.anomaly_detected());
    }

    #[test]
    fn test_expected_output_passes() {
        let mut check = shell("echo ' 0 '");
        assert!(check.is_enabled());
        assert!(!check.anomaly_detected());
    }

    #[test]
    fn test_other_digit_is_slip() {
        assert!(shell("echo 1").anomaly_detected());
        assert!(shell("true").anomaly_detected());
    }

    #[test]
    fn test_command_failure_is_slip() {
        assert!(shell("echo 0; exit 3").anomaly_detected());

        let mut missing = CommandSlipCheck::new(&SlipCheckConfig {
            command: vec!["/nonexistent/lockbreaker-ocr".into()],
            expected: "0".into(),
        });
        assert!(missing.anomaly_detected());
    }
}

//! Build script for lockbreaker-firmware
//!
//! Validates machine.toml at compile time so a broken embedded default is
//! caught before it reaches the rig.

use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    validate_config();
}

/// Validate machine.toml syntax
fn validate_config() {
    println!("cargo:rerun-if-changed=machine.toml");

    let config_path = Path::new("machine.toml");
    if !config_path.exists() {
        panic!("machine.toml not found: the binary embeds it as its default configuration");
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => panic!("failed to read machine.toml: {e}"),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => panic!("invalid TOML syntax in machine.toml:\n{e}"),
    };

    for section in ["dial", "stepper", "servo", "probe", "pins"] {
        if config.get(section).is_none() {
            println!("cargo:warning=machine.toml has no [{section}] section, defaults apply");
        }
    }
}

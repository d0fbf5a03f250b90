//! Compiler profile: version pin and optimizer settings

use serde::Serialize;
use serde_json::json;
use std::fmt;

use crate::error::{ConfigError, ConfigResult};

/// Validated compiler settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilerProfile {
    /// Compiler release, `MAJOR.MINOR.PATCH`
    pub version: String,
    pub optimizer: OptimizerSettings,
}

/// Optimizer switch and its tuning parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptimizerSettings {
    pub enabled: bool,
    /// Expected number of contract executions; trades code size for runtime gas
    pub runs: u32,
}

impl CompilerProfile {
    /// Build a profile, checking the version string.
    pub fn new(version: impl Into<String>, enabled: bool, runs: u32) -> ConfigResult<Self> {
        let version = version.into();
        parse_release(&version)
            .map_err(|reason| ConfigError::invalid("compiler.version", reason))?;

        Ok(CompilerProfile {
            version,
            optimizer: OptimizerSettings { enabled, runs },
        })
    }

    /// Release triple of the pinned compiler.
    pub fn release(&self) -> (u64, u64, u64) {
        // The version was checked on construction.
        parse_release(&self.version).unwrap_or_default()
    }

    /// The `settings` object of a solc standard-JSON input.
    pub fn solc_settings(&self) -> serde_json::Value {
        json!({
            "optimizer": {
                "enabled": self.optimizer.enabled,
                "runs": self.optimizer.runs,
            }
        })
    }
}

impl fmt::Display for CompilerProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optimizer.enabled {
            write!(f, "{} (optimizer on, {} runs)", self.version, self.optimizer.runs)
        } else {
            write!(f, "{} (optimizer off)", self.version)
        }
    }
}

/// Parse `MAJOR.MINOR.PATCH`, ignoring any `-prerelease` or `+build` suffix.
fn parse_release(version: &str) -> Result<(u64, u64, u64), String> {
    let core = version
        .split(['-', '+'])
        .next()
        .unwrap_or_default();

    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() != 3 {
        return Err(format!(
            "must be a MAJOR.MINOR.PATCH release, got {version:?}"
        ));
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!(
                "must be a MAJOR.MINOR.PATCH release, got {version:?}"
            ));
        }
        *slot = part
            .parse()
            .map_err(|_| format!("version component {part:?} is out of range"))?;
    }

    Ok((numbers[0], numbers[1], numbers[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_parsing() {
        let profile = CompilerProfile::new("0.8.19", true, 1000).unwrap();
        assert_eq!(profile.release(), (0, 8, 19));

        let nightly = CompilerProfile::new("0.8.20-nightly.2023.4.6", false, 200).unwrap();
        assert_eq!(nightly.release(), (0, 8, 20));
    }

    #[test]
    fn test_invalid_versions() {
        for version in ["", "0.8", "v0.8.19", "0.8.x", "0..19", "latest"] {
            let err = CompilerProfile::new(version, true, 200).unwrap_err();
            assert_eq!(err.field(), Some("compiler.version"), "version {version:?}");
        }
    }

    #[test]
    fn test_solc_settings_block() {
        let profile = CompilerProfile::new("0.8.19", true, 1000).unwrap();
        assert_eq!(
            profile.solc_settings(),
            json!({ "optimizer": { "enabled": true, "runs": 1000 } })
        );
    }

    #[test]
    fn test_display() {
        let on = CompilerProfile::new("0.8.19", true, 1000).unwrap();
        assert_eq!(on.to_string(), "0.8.19 (optimizer on, 1000 runs)");

        let off = CompilerProfile::new("0.8.19", false, 200).unwrap();
        assert_eq!(off.to_string(), "0.8.19 (optimizer off)");
    }
}

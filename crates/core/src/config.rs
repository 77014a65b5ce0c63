//! Configuration system for the scheduler.
//!
//! This module defines the configuration tree used to parameterize scheduling and
//! printing. It provides:
//! 1. **Defaults:** Baseline constants for issue width and printer behaviour.
//! 2. **Structures:** Hierarchical config for general, scheduling, and printer options.
//! 3. **Loading:** JSON parsing from strings or files, followed by validation.
//!
//! Every field is optional in JSON; missing fields take their defaults.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::{ConfigError, MAX_ISSUE_WIDTH};

/// Default configuration constants.
mod defaults {
    /// Instructions per bundle before a cycle boundary is forced (a full execute packet).
    pub const ISSUE_WIDTH: usize = super::MAX_ISSUE_WIDTH;

    /// Print `||` continuation markers.
    pub const BUNDLE_MODE: bool = true;

    /// Print the scheduled cycle count ahead of each function.
    pub const CYCLE_COMMENT: bool = true;
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use c64x_sched_core::Config;
///
/// let json = r#"{ "sched": { "issue_width": 4 }, "printer": { "bundle_mode": false } }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.sched.issue_width, 4);
/// assert!(!config.printer.bundle_mode);
/// assert!(config.printer.cycle_comment);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// General options.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Bundle packing options.
    #[serde(default)]
    pub sched: SchedConfig,
    /// Assembly printer options.
    #[serde(default)]
    pub printer: PrinterConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let width = self.sched.issue_width;
        if width == 0 || width > MAX_ISSUE_WIDTH {
            return Err(ConfigError::IssueWidth(width));
        }
        Ok(())
    }
}

/// General options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct GeneralConfig {
    /// Log every hazard decision at debug level.
    #[serde(default)]
    pub trace_hazards: bool,
}

/// Bundle packing options.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SchedConfig {
    /// Maximum real instructions per bundle.
    #[serde(default = "SchedConfig::default_issue_width")]
    pub issue_width: usize,
}

impl SchedConfig {
    const fn default_issue_width() -> usize {
        defaults::ISSUE_WIDTH
    }
}

impl Default for SchedConfig {
    fn default() -> Self {
        Self {
            issue_width: defaults::ISSUE_WIDTH,
        }
    }
}

/// Assembly printer options.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PrinterConfig {
    /// Join instructions of a bundle with `||`; otherwise one instruction per line.
    #[serde(default = "PrinterConfig::default_bundle_mode")]
    pub bundle_mode: bool,
    /// Emit `; SCHEDULED CYCLES: n` before each function.
    #[serde(default = "PrinterConfig::default_cycle_comment")]
    pub cycle_comment: bool,
}

impl PrinterConfig {
    const fn default_bundle_mode() -> bool {
        defaults::BUNDLE_MODE
    }

    const fn default_cycle_comment() -> bool {
        defaults::CYCLE_COMMENT
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            bundle_mode: defaults::BUNDLE_MODE,
            cycle_comment: defaults::CYCLE_COMMENT,
        }
    }
}

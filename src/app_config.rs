use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::AppError;
use crate::timecodes::InvertedRangePolicy;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Suffix appended to the input file stem to build the default output path
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Repair settings
    #[serde(default)]
    pub repair: RepairConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the repair pipeline
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RepairConfig {
    /// Pull back end times that run into the next caption
    #[serde(default = "default_true")]
    pub fix_overlaps: bool,

    /// Trim and replace punctuation in caption text
    #[serde(default = "default_true")]
    pub normalize_punctuation: bool,

    /// Handling of captions that end before they start
    #[serde(default)]
    pub inverted_range_policy: InvertedRangePolicy,

    /// Fail on malformed timestamps instead of substituting 00:00:00,000
    #[serde(default)]
    pub strict_timestamps: bool,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            fix_overlaps: true,
            normalize_punctuation: true,
            inverted_range_policy: InvertedRangePolicy::default(),
            strict_timestamps: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_output_suffix() -> String {
    "_fixed".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration if the file exists, defaults otherwise
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.output_suffix.is_empty() {
            return Err(AppError::Config("output suffix must not be empty".to_string()).into());
        }

        if self.output_suffix.contains(['/', '\\']) {
            return Err(AppError::Config(format!(
                "output suffix must not contain path separators: {}",
                self.output_suffix
            ))
            .into());
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            output_suffix: default_output_suffix(),
            repair: RepairConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

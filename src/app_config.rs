use anyhow::{anyhow, Context, Result};
use log::{debug, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::timestamp::TimestampPolicy;

/// Application configuration module
/// This module handles the optional JSON configuration file. Every field has
/// a default, so a missing file or a partial file is fine.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Subtitle parsing settings
    #[serde(default)]
    pub subtitles: SubtitleConfig,
}

/// Configuration for subtitle processing
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubtitleConfig {
    /// How clock times in the time range lines are checked
    #[serde(default)]
    pub timestamp_policy: TimestampPolicy,

    /// Refuse to write output when a transform had to clamp times
    #[serde(default)]
    pub reject_clamped: bool,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            timestamp_policy: TimestampPolicy::Permissive,
            reject_clamped: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::Off,
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

// Implement FromStr trait for LogLevel
impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, or defaults if it does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::from_file(path)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Serialize the configuration as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")
    }
}

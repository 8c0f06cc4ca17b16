//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and
//! default every field, so an empty file is a valid configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::logger::{Format, Level};

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Record level, format, and file output.
    pub log: OutputConfig,

    /// Periodic upload of the log file.
    pub upload: UploadConfig,
}

/// Logging output configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Minimum level emitted.
    pub level: Level,

    /// Record format.
    pub format: Format,

    /// Log file; records go to stdout only when unset.
    pub file_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            format: Format::Text,
            file_path: None,
        }
    }
}

/// Upload configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Start the upload loop when a file path is configured.
    pub enabled: bool,

    /// Seconds between uploads.
    pub interval_secs: u64,

    /// Object storage region; selects the default endpoint.
    pub region: String,

    /// Explicit endpoint overriding the region default.
    pub endpoint: Option<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 600,
            region: "us-west-2".to_string(),
            endpoint: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: LogConfig = toml::from_str("").unwrap();
        assert_eq!(config, LogConfig::default());
        assert_eq!(config.upload.interval_secs, 600);
        assert_eq!(config.upload.region, "us-west-2");
    }

    #[test]
    fn test_partial_document() {
        let config: LogConfig = toml::from_str(
            r#"
            [log]
            level = "warning"
            format = "json"
            file_path = "/var/log/traefik.log"

            [upload]
            interval_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.log.level, Level::Warn);
        assert_eq!(config.log.format, Format::Json);
        assert_eq!(config.log.file_path, Some(PathBuf::from("/var/log/traefik.log")));
        assert_eq!(config.upload.interval_secs, 30);
        assert!(config.upload.enabled);
    }
}

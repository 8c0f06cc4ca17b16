//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All problems are
//! reported at once rather than stopping at the first.

use std::fmt;

use url::Url;

use crate::config::schema::LogConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration.
pub fn validate_config(config: &LogConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(path) = &config.log.file_path {
        if path.as_os_str().is_empty() {
            errors.push(ValidationError::new("log.file_path", "must not be empty"));
        }
    }

    if config.upload.interval_secs == 0 {
        errors.push(ValidationError::new("upload.interval_secs", "must be greater than 0"));
    }

    if config.upload.region.trim().is_empty() {
        errors.push(ValidationError::new("upload.region", "must not be empty"));
    }

    if let Some(endpoint) = &config.upload.endpoint {
        match Url::parse(endpoint) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ValidationError::new(
                "upload.endpoint",
                format!("unsupported scheme '{}'", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new("upload.endpoint", e.to_string())),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&LogConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = LogConfig::default();
        config.log.file_path = Some(PathBuf::new());
        config.upload.interval_secs = 0;
        config.upload.region = " ".into();
        config.upload.endpoint = Some("ftp://example.com".into());

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["log.file_path", "upload.interval_secs", "upload.region", "upload.endpoint"]
        );
    }

    #[test]
    fn test_rejects_unparseable_endpoint() {
        let mut config = LogConfig::default();
        config.upload.endpoint = Some("not a url".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "upload.endpoint");
    }
}

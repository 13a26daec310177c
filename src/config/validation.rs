//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval and timeouts > 0)
//! - Check target URIs and headers are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - An empty target list is valid

use reqwest::header::{HeaderName, HeaderValue};
use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::{MonitorConfig, TargetConfig};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("check_interval_ms must be greater than zero")]
    ZeroInterval,

    #[error("check_timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("target '{uri}': invalid URI ({reason})")]
    InvalidUri { uri: String, reason: String },

    #[error("target '{uri}': unsupported scheme '{scheme}', expected http or https")]
    UnsupportedScheme { uri: String, scheme: String },

    #[error("target '{uri}': timeout_ms must be greater than zero")]
    ZeroTargetTimeout { uri: String },

    #[error("target '{uri}': invalid header '{name}'")]
    InvalidHeader { uri: String, name: String },

    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.check_interval_ms == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.check_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    for target in &config.targets {
        validate_target(target, &mut errors);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_target(target: &TargetConfig, errors: &mut Vec<ValidationError>) {
    match Url::parse(&target.uri) {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ValidationError::UnsupportedScheme {
                uri: target.uri.clone(),
                scheme: url.scheme().to_string(),
            });
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidUri {
            uri: target.uri.clone(),
            reason: e.to_string(),
        }),
    }

    if target.timeout_ms == Some(0) {
        errors.push(ValidationError::ZeroTargetTimeout {
            uri: target.uri.clone(),
        });
    }

    for (name, value) in &target.headers {
        let valid = HeaderName::from_bytes(name.as_bytes()).is_ok()
            && HeaderValue::from_str(value).is_ok();
        if !valid {
            errors.push(ValidationError::InvalidHeader {
                uri: target.uri.clone(),
                name: name.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&MonitorConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_targets_are_valid() {
        let config = MonitorConfig {
            targets: Vec::new(),
            ..MonitorConfig::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut bad_header = TargetConfig::new("https://example.com/");
        bad_header.headers.insert("bad header".into(), "x".into());
        let mut zero_timeout = TargetConfig::new("https://example.org/");
        zero_timeout.timeout_ms = Some(0);

        let mut config = MonitorConfig {
            check_interval_ms: 0,
            check_timeout_ms: 0,
            targets: vec![
                TargetConfig::new("not a uri"),
                TargetConfig::new("ftp://example.com/"),
                bad_header,
                zero_timeout,
            ],
            ..MonitorConfig::default()
        };
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 7);
        assert!(errors.contains(&ValidationError::ZeroInterval));
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::UnsupportedScheme {
            uri: "ftp://example.com/".into(),
            scheme: "ftp".into(),
        }));
        assert!(errors.contains(&ValidationError::InvalidHeader {
            uri: "https://example.com/".into(),
            name: "bad header".into(),
        }));
        assert!(errors.contains(&ValidationError::ZeroTargetTimeout {
            uri: "https://example.org/".into(),
        }));
        assert!(errors.contains(&ValidationError::InvalidMetricsAddress("nowhere".into())));
        assert!(matches!(errors[2], ValidationError::InvalidUri { .. }));
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = MonitorConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());
    }
}

//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::probe::Target;
use crate::status::store::{
    ConfigStore, DEFAULT_CHECK_INTERVAL, DEFAULT_CHECK_TIMEOUT, DEFAULT_TARGET_URIS,
};

/// Root configuration for the connectivity monitor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Pause between periodic checks in milliseconds.
    pub check_interval_ms: u64,

    /// Default per-probe timeout in milliseconds.
    pub check_timeout_ms: u64,

    /// Endpoints to probe. Empty means "always disconnected".
    pub targets: Vec<TargetConfig>,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: DEFAULT_CHECK_INTERVAL.as_millis() as u64,
            check_timeout_ms: DEFAULT_CHECK_TIMEOUT.as_millis() as u64,
            targets: DEFAULT_TARGET_URIS.iter().map(|uri| TargetConfig::new(uri)).collect(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl MonitorConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_millis(self.check_timeout_ms)
    }

    /// Build probe targets from the configured entries.
    pub fn to_targets(&self) -> Result<Vec<Target>, url::ParseError> {
        self.targets.iter().map(TargetConfig::to_target).collect()
    }

    /// Build the runtime store a tracker is constructed with.
    pub fn to_store(&self) -> Result<ConfigStore, url::ParseError> {
        Ok(ConfigStore::new(
            self.to_targets()?,
            self.check_interval(),
            self.check_timeout(),
        ))
    }
}

/// A single probe target.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TargetConfig {
    /// Absolute http(s) URI to GET.
    pub uri: String,

    /// Extra request headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Overrides `check_timeout_ms` for this target.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl TargetConfig {
    pub fn new(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            headers: HashMap::new(),
            timeout_ms: None,
        }
    }

    pub fn to_target(&self) -> Result<Target, url::ParseError> {
        let mut target = Target::parse(&self.uri)?.with_headers(self.headers.clone());
        if let Some(ms) = self.timeout_ms {
            target = target.with_timeout(Duration::from_millis(ms));
        }
        Ok(target)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

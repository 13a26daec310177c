//! Probe targets and per-probe results.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use url::Url;

/// One endpoint to check for reachability.
///
/// Targets are immutable once built; the builder methods consume `self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    uri: Url,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl Target {
    /// Create a target with no extra headers that uses the store's default timeout.
    pub fn new(uri: Url) -> Self {
        Self {
            uri,
            headers: HashMap::new(),
            timeout: None,
        }
    }

    /// Parse a target from a URI string.
    pub fn parse(uri: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(uri)?))
    }

    /// Add a request header sent with every probe of this target.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replace all request headers.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Override the default check timeout for this target.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// The explicit timeout, if one was set.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The timeout a probe of this target runs with.
    pub fn effective_timeout(&self, default: Duration) -> Duration {
        self.timeout.unwrap_or(default)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri)
    }
}

/// Outcome of probing one target once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub target: Target,
    pub success: bool,
}

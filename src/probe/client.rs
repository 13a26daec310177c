//! HTTP client capability used by probes.
//!
//! # Responsibilities
//! - Define the narrow "GET with headers and timeout" seam
//! - Provide the default reqwest-backed implementation

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;
use url::Url;

const USER_AGENT: &str = concat!("connectivity-monitor/", env!("CARGO_PKG_VERSION"));

/// Reasons a single GET could not produce a status code.
///
/// Probes collapse all of these to "unreachable"; the variants exist for logging.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A configured header name or value is not valid HTTP.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// No response within the allotted time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection, TLS, DNS or protocol failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Issue one HTTP GET and report the response status code.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(
        &self,
        uri: &Url,
        headers: &HashMap<String, String>,
        timeout: Duration,
    ) -> Result<u16, ProbeError>;
}

/// [`HttpClient`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Build a client with the crate's user agent.
    pub fn new() -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client (custom proxies, TLS roots, pool settings).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, ProbeError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ProbeError::InvalidHeader(name.clone()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ProbeError::InvalidHeader(name.to_string()))?;
        map.insert(name, value);
    }
    Ok(map)
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(
        &self,
        uri: &Url,
        headers: &HashMap<String, String>,
        timeout: Duration,
    ) -> Result<u16, ProbeError> {
        let response = self
            .client
            .get(uri.clone())
            .headers(header_map(headers)?)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProbeError::Timeout(timeout)
                } else {
                    ProbeError::Request(e)
                }
            })?;

        Ok(response.status().as_u16())
    }
}

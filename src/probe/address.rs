//! Single-address reachability probe.
//!
//! # Responsibilities
//! - Issue one GET per target with its headers
//! - Bound the request by the target's timeout (or the default)
//! - Convert every outcome into a `ProbeResult`

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

use crate::observability::metrics;
use crate::probe::client::HttpClient;
use crate::probe::target::{ProbeResult, Target};

/// The only status code that counts as reachable.
const REACHABLE_STATUS: u16 = 200;

/// Probes a single target through an injected [`HttpClient`].
#[derive(Clone)]
pub struct AddressProbe {
    client: Arc<dyn HttpClient>,
    default_timeout: Duration,
}

impl AddressProbe {
    pub fn new(client: Arc<dyn HttpClient>, default_timeout: Duration) -> Self {
        Self {
            client,
            default_timeout,
        }
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Check whether `target` answers with HTTP 200 within its timeout.
    ///
    /// Never fails: errors and timeouts are reported as `success = false`.
    pub async fn probe(&self, target: &Target) -> ProbeResult {
        let timeout = target.effective_timeout(self.default_timeout);
        let request = self.client.get(target.uri(), target.headers(), timeout);

        // The client gets the timeout too, but the probe enforces it regardless.
        let success = match time::timeout(timeout, request).await {
            Ok(Ok(REACHABLE_STATUS)) => true,
            Ok(Ok(status)) => {
                tracing::debug!(uri = %target.uri(), status, "Probe failed: unexpected status");
                false
            }
            Ok(Err(e)) => {
                tracing::debug!(uri = %target.uri(), error = %e, "Probe failed: request error");
                false
            }
            Err(_) => {
                tracing::debug!(uri = %target.uri(), timeout = ?timeout, "Probe failed: timeout");
                false
            }
        };

        metrics::record_probe(success);

        ProbeResult {
            target: target.clone(),
            success,
        }
    }
}

impl fmt::Debug for AddressProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressProbe")
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

//! Runtime configuration: target list, check timeout and check interval.

use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Duration;

use crate::probe::Target;

/// Default per-probe timeout.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(4);

/// Default pause between periodic checks.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(5);

/// Endpoints probed when none are configured.
pub const DEFAULT_TARGET_URIS: [&str; 2] = ["https://one.one.one.one/", "https://icanhazip.com/"];

/// The built-in target list.
pub fn default_targets() -> Vec<Target> {
    DEFAULT_TARGET_URIS
        .iter()
        .filter_map(|uri| Target::parse(uri).ok())
        .collect()
}

/// Holds the target list behind an atomically swapped snapshot.
///
/// The list is replaced wholesale, never edited; readers keep whatever
/// snapshot they loaded. Timeout and interval are fixed at construction.
#[derive(Debug)]
pub struct ConfigStore {
    targets: ArcSwap<Vec<Target>>,
    check_interval: Duration,
    check_timeout: Duration,
}

impl ConfigStore {
    pub fn new(targets: Vec<Target>, check_interval: Duration, check_timeout: Duration) -> Self {
        Self {
            targets: ArcSwap::from_pointee(targets),
            check_interval,
            check_timeout,
        }
    }

    /// Current target snapshot.
    pub fn addresses(&self) -> Arc<Vec<Target>> {
        self.targets.load_full()
    }

    /// Swap in a new target list. Callers that need a re-check go through the tracker.
    pub(crate) fn replace(&self, targets: Vec<Target>) {
        self.targets.store(Arc::new(targets));
    }

    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    pub fn check_timeout(&self) -> Duration {
        self.check_timeout
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(default_targets(), DEFAULT_CHECK_INTERVAL, DEFAULT_CHECK_TIMEOUT)
    }
}

//! Listener-driven connection status tracking.
//!
//! # States
//! - Idle: no listeners, no driver task
//! - Active: at least one listener, one driver task checking or sleeping
//!
//! # State Transitions
//! ```text
//! Idle → Active:   first listener attaches; last status reset, immediate check
//! Active → Active: check finished; emit if status changed, sleep interval, repeat
//! Active → Active: target list replaced; driver restarted, immediate check
//! Active → Idle:   last listener detaches; driver aborted, last status reset
//! ```
//!
//! # Design Decisions
//! - Every driver start bumps an epoch; results from older drivers are dropped
//! - The interval runs from check completion, so the period includes probe latency
//! - Resetting last status on detach guarantees a fresh listener one emission

use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time;

use crate::observability::metrics;
use crate::probe::{AddressProbe, HttpClient, Target};
use crate::reachability::{ConnectionStatus, ReachabilityAggregator};
use crate::status::store::ConfigStore;

/// Buffered status events per listener before it starts lagging.
const EVENT_CAPACITY: usize = 16;

#[derive(Debug)]
enum Phase {
    Idle,
    Active { driver: JoinHandle<()> },
}

#[derive(Debug)]
struct TrackerState {
    phase: Phase,
    listeners: usize,
    epoch: u64,
    last_status: Option<ConnectionStatus>,
}

impl TrackerState {
    fn stop_driver(&mut self) {
        if let Phase::Active { driver } = mem::replace(&mut self.phase, Phase::Idle) {
            driver.abort();
        }
    }
}

struct Inner {
    store: ConfigStore,
    aggregator: ReachabilityAggregator,
    events: broadcast::Sender<ConnectionStatus>,
    state: Mutex<TrackerState>,
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Abort any running driver and start a new one that checks immediately.
    fn restart_driver(self: &Arc<Self>, state: &mut TrackerState) {
        state.stop_driver();
        state.epoch = state.epoch.wrapping_add(1);
        let driver = tokio::spawn(drive(Arc::downgrade(self), state.epoch));
        state.phase = Phase::Active { driver };
    }

    /// Store a finished check. Returns `false` if the driver that produced it is stale.
    fn apply(&self, epoch: u64, status: ConnectionStatus) -> bool {
        let mut state = self.lock_state();
        if state.epoch != epoch || state.listeners == 0 {
            tracing::debug!(%status, "Discarding result of a superseded check");
            return false;
        }

        let previous = state.last_status.replace(status);
        metrics::record_status(status);

        if previous != Some(status) {
            tracing::info!(%status, previous = ?previous, "Connection status changed");
            // Sent under the lock so listeners see changes in order.
            let _ = self.events.send(status);
        }
        true
    }

    fn detach(&self) {
        let mut state = self.lock_state();
        state.listeners = state.listeners.saturating_sub(1);
        metrics::record_listeners(state.listeners);

        if state.listeners == 0 {
            state.stop_driver();
            state.epoch = state.epoch.wrapping_add(1);
            state.last_status = None;
            tracing::debug!("Last listener detached, status checks stopped");
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        state.stop_driver();
    }
}

/// Periodic check loop for one epoch.
async fn drive(inner: Weak<Inner>, epoch: u64) {
    loop {
        let interval = {
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let targets = inner.store.addresses();
            let status = inner.aggregator.connection_status(&targets).await;
            if !inner.apply(epoch, status) {
                return;
            }
            inner.store.check_interval()
        };

        time::sleep(interval).await;
    }
}

/// Tracks internet connectivity and broadcasts status changes to listeners.
///
/// Checks run periodically only while at least one [`StatusSubscription`]
/// is alive. Cloning yields another handle to the same tracker.
#[derive(Clone)]
pub struct StatusTracker {
    inner: Arc<Inner>,
}

impl StatusTracker {
    pub fn new(client: Arc<dyn HttpClient>, store: ConfigStore) -> Self {
        let probe = AddressProbe::new(client, store.check_timeout());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                store,
                aggregator: ReachabilityAggregator::new(probe),
                events,
                state: Mutex::new(TrackerState {
                    phase: Phase::Idle,
                    listeners: 0,
                    epoch: 0,
                    last_status: None,
                }),
            }),
        }
    }

    /// Attach a listener to the status stream.
    ///
    /// The first listener starts periodic checking with an immediate check.
    /// Must be called from within a Tokio runtime.
    pub fn subscribe(&self) -> StatusSubscription {
        let receiver = self.inner.events.subscribe();

        let mut state = self.inner.lock_state();
        state.listeners += 1;
        metrics::record_listeners(state.listeners);

        if state.listeners == 1 {
            state.last_status = None;
            tracing::debug!("First listener attached, starting status checks");
            self.inner.restart_driver(&mut state);
        }
        drop(state);

        StatusSubscription {
            receiver,
            tracker: Arc::downgrade(&self.inner),
        }
    }

    /// Run one on-demand check against the current targets.
    ///
    /// Does not touch the periodic schedule or the stored status.
    pub async fn has_connection(&self) -> bool {
        let targets = self.inner.store.addresses();
        self.inner.aggregator.has_connection(&targets).await
    }

    /// [`has_connection`](Self::has_connection) mapped to a [`ConnectionStatus`].
    pub async fn connection_status(&self) -> ConnectionStatus {
        self.has_connection().await.into()
    }

    /// Current target snapshot.
    pub fn addresses(&self) -> Arc<Vec<Target>> {
        self.inner.store.addresses()
    }

    /// Replace the target list. With listeners attached, re-checks immediately.
    pub fn set_addresses(&self, targets: Vec<Target>) {
        let count = targets.len();
        self.inner.store.replace(targets);

        let mut state = self.inner.lock_state();
        if state.listeners > 0 {
            tracing::debug!(targets = count, "Targets replaced, re-checking now");
            self.inner.restart_driver(&mut state);
        } else {
            tracing::debug!(targets = count, "Targets replaced");
        }
    }

    pub fn check_interval(&self) -> Duration {
        self.inner.store.check_interval()
    }

    pub fn check_timeout(&self) -> Duration {
        self.inner.store.check_timeout()
    }

    /// Last status seen by the periodic loop; `None` while idle or before the first check.
    pub fn last_status(&self) -> Option<ConnectionStatus> {
        self.inner.lock_state().last_status
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock_state().listeners
    }

    /// Whether periodic checking is running.
    pub fn is_active(&self) -> bool {
        matches!(self.inner.lock_state().phase, Phase::Active { .. })
    }
}

impl std::fmt::Debug for StatusTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock_state();
        f.debug_struct("StatusTracker")
            .field("targets", &self.inner.store.addresses().len())
            .field("check_interval", &self.inner.store.check_interval())
            .field("check_timeout", &self.inner.store.check_timeout())
            .field("listeners", &state.listeners)
            .field("last_status", &state.last_status)
            .finish()
    }
}

/// A listener on a [`StatusTracker`]. Dropping it detaches the listener.
#[derive(Debug)]
pub struct StatusSubscription {
    receiver: broadcast::Receiver<ConnectionStatus>,
    tracker: Weak<Inner>,
}

impl StatusSubscription {
    /// Wait for the next status change.
    ///
    /// Returns `None` once every tracker handle has been dropped. A listener
    /// that falls behind skips to the oldest change still buffered.
    pub async fn recv(&mut self) -> Option<ConnectionStatus> {
        loop {
            match self.receiver.recv().await {
                Ok(status) => return Some(status),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Status listener lagged, skipping missed changes");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for StatusSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.tracker.upgrade() {
            inner.detach();
        }
    }
}

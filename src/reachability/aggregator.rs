//! First-success-wins reachability check across many targets.
//!
//! # Responsibilities
//! - Probe every target concurrently
//! - Resolve `true` on the first successful probe
//! - Resolve `false` only after every probe has failed
//!
//! # Design Decisions
//! - Not a plain `select_ok`: all-failure must be counted, not raised
//! - Resolution is single-shot, guarded by a compare-and-set flag
//! - Probes are spawned, so the caller never waits on losers

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::oneshot;

use crate::observability::metrics;
use crate::probe::{AddressProbe, ProbeResult, Target};
use crate::reachability::status::ConnectionStatus;

/// Shared resolution state for one aggregate check.
struct Race {
    /// Probes that have not reported yet.
    pending: AtomicUsize,
    resolved: AtomicBool,
    signal: Mutex<Option<oneshot::Sender<bool>>>,
}

impl Race {
    fn new(probes: usize, signal: oneshot::Sender<bool>) -> Self {
        Self {
            pending: AtomicUsize::new(probes),
            resolved: AtomicBool::new(false),
            signal: Mutex::new(Some(signal)),
        }
    }

    /// Deliver the outcome. Only the first call has any effect.
    fn resolve(&self, connected: bool) {
        if self
            .resolved
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let sender = match self.signal.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(sender) = sender {
            // Receiver is gone if the tracker cancelled this cycle.
            let _ = sender.send(connected);
        }
    }

    /// Record one finished probe.
    fn complete(&self, result: &ProbeResult) {
        // Success must resolve before the counter can reach zero.
        if result.success {
            self.resolve(true);
        }
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.resolve(false);
        }
    }
}

/// Races probes against a set of targets.
#[derive(Debug, Clone)]
pub struct ReachabilityAggregator {
    probe: AddressProbe,
}

impl ReachabilityAggregator {
    pub fn new(probe: AddressProbe) -> Self {
        Self { probe }
    }

    pub fn probe(&self) -> &AddressProbe {
        &self.probe
    }

    /// Return `true` as soon as any target is reachable, `false` once all have failed.
    ///
    /// An empty target list resolves `false` without touching the network.
    /// Must be called from within a Tokio runtime.
    pub async fn has_connection(&self, targets: &[Target]) -> bool {
        if targets.is_empty() {
            tracing::debug!("No targets configured, reporting disconnected");
            return false;
        }

        let started = Instant::now();
        let (tx, rx) = oneshot::channel();
        let race = Arc::new(Race::new(targets.len(), tx));

        for target in targets {
            let probe = self.probe.clone();
            let race = race.clone();
            let target = target.clone();
            tokio::spawn(async move {
                let result = probe.probe(&target).await;
                race.complete(&result);
            });
        }
        drop(race);

        // The sender only drops unresolved if every probe task died early.
        let connected = rx.await.unwrap_or(false);

        tracing::debug!(
            targets = targets.len(),
            connected,
            elapsed = ?started.elapsed(),
            "Aggregate check finished"
        );
        metrics::record_check_duration(started);

        connected
    }

    /// [`has_connection`](Self::has_connection) mapped to a [`ConnectionStatus`].
    pub async fn connection_status(&self, targets: &[Target]) -> ConnectionStatus {
        self.has_connection(targets).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::client::fake::{Reply, ScriptedClient};
    use std::time::Duration;

    fn aggregator(client: Arc<ScriptedClient>) -> ReachabilityAggregator {
        ReachabilityAggregator::new(AddressProbe::new(client, Duration::from_secs(2)))
    }

    fn targets(hosts: &[&str]) -> Vec<Target> {
        hosts
            .iter()
            .map(|host| Target::parse(&format!("https://{host}/")).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_empty_targets_disconnected_without_network() {
        let client = Arc::new(ScriptedClient::new());
        let agg = aggregator(client.clone());

        assert!(!agg.has_connection(&[]).await);
        assert_eq!(agg.connection_status(&[]).await, ConnectionStatus::Disconnected);
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_any_success_is_connected() {
        let client = Arc::new(ScriptedClient::new());
        client.script("a.test", Duration::from_millis(5), Reply::Fail);
        client.script("b.test", Duration::from_millis(10), Reply::Status(500));
        client.script("c.test", Duration::from_millis(15), Reply::Status(200));
        let agg = aggregator(client);

        assert!(agg.has_connection(&targets(&["a.test", "b.test", "c.test"])).await);
    }

    #[tokio::test]
    async fn test_all_failures_are_disconnected() {
        let client = Arc::new(ScriptedClient::new());
        client.script("a.test", Duration::from_millis(5), Reply::Fail);
        client.script("b.test", Duration::from_millis(100), Reply::Status(404));
        let agg = aggregator(client);

        let start = Instant::now();
        let connected = agg.has_connection(&targets(&["a.test", "b.test"])).await;

        assert!(!connected);
        // Disconnected is only known once the slowest probe has failed.
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_first_success_does_not_wait_for_slow_failure() {
        let client = Arc::new(ScriptedClient::new());
        client.script("fast.test", Duration::from_millis(50), Reply::Status(200));
        client.script("slow.test", Duration::from_millis(200), Reply::Fail);
        let agg = aggregator(client);

        let start = Instant::now();
        assert!(agg.has_connection(&targets(&["fast.test", "slow.test"])).await);
        assert!(start.elapsed() < Duration::from_millis(180));
    }

    #[tokio::test]
    async fn test_first_success_does_not_wait_for_hanging_probe() {
        let client = Arc::new(ScriptedClient::new());
        client.script("ok.test", Duration::from_millis(10), Reply::Status(200));
        client.script("hang.test", Duration::ZERO, Reply::Hang);
        let agg = aggregator(client);

        let start = Instant::now();
        assert!(agg.has_connection(&targets(&["hang.test", "ok.test"])).await);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_connection_status_is_idempotent() {
        let client = Arc::new(ScriptedClient::new());
        client.script("ok.test", Duration::ZERO, Reply::Status(200));
        let agg = aggregator(client.clone());
        let list = targets(&["ok.test"]);

        let first = agg.connection_status(&list).await;
        let second = agg.connection_status(&list).await;

        assert_eq!(first, ConnectionStatus::Connected);
        assert_eq!(first, second);
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_race_resolves_once() {
        let (tx, rx) = oneshot::channel();
        let race = Race::new(3, tx);
        let target = Target::parse("https://x.test/").unwrap();

        race.complete(&ProbeResult { target: target.clone(), success: true });
        race.complete(&ProbeResult { target: target.clone(), success: true });
        race.complete(&ProbeResult { target, success: false });

        assert!(rx.await.unwrap());
        assert!(race.resolved.load(Ordering::Acquire));
        assert_eq!(race.pending.load(Ordering::Acquire), 0);
    }

    #[tokio::test]
    async fn test_race_resolves_false_after_last_failure() {
        let (tx, mut rx) = oneshot::channel();
        let race = Race::new(2, tx);
        let target = Target::parse("https://x.test/").unwrap();

        race.complete(&ProbeResult { target: target.clone(), success: false });
        assert!(rx.try_recv().is_err());

        race.complete(&ProbeResult { target, success: false });
        assert!(!rx.await.unwrap());
    }
}

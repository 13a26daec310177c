//! Internet connectivity monitor.
//!
//! Probes a set of HTTP endpoints to decide whether the host is online and
//! broadcasts status changes to listeners while any are attached.

pub mod config;
pub mod observability;
pub mod probe;
pub mod reachability;
pub mod status;

pub use config::MonitorConfig;
pub use probe::{HttpClient, ProbeError, ReqwestClient, Target};
pub use reachability::{ConnectionStatus, ReachabilityAggregator};
pub use status::{ConfigStore, StatusSubscription, StatusTracker};

//! Multi-target reachability aggregation.
//!
//! # Data Flow
//! ```text
//! Target snapshot
//!     → aggregator.rs spawns one AddressProbe per target
//!     → first success resolves Connected
//!     → all failures resolve Disconnected
//! ```
//!
//! # Design Decisions
//! - One reachable endpoint anywhere is enough (race to first success)
//! - Losing probes keep running detached; their results are ignored
//! - An empty target list is a legal "always disconnected" configuration

pub mod aggregator;
pub mod status;

pub use aggregator::ReachabilityAggregator;
pub use status::ConnectionStatus;

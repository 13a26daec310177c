//! Connection status tracking subsystem.
//!
//! # Data Flow
//! ```text
//! store.rs (target snapshot, timeout, interval)
//!     → tracker.rs driver task
//!     → ReachabilityAggregator check
//!     → compare with last status
//!     → broadcast change to StatusSubscription listeners
//!     → sleep interval, repeat while listeners remain
//! ```
//!
//! # Design Decisions
//! - Listener count drives the timer: no listeners, no checks
//! - Target list swaps are whole-list and trigger an immediate re-check
//! - On-demand queries never touch the periodic schedule

pub mod store;
pub mod tracker;

pub use store::ConfigStore;
pub use tracker::{StatusSubscription, StatusTracker};

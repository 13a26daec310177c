//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! probe / aggregator / tracker produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout via tracing-subscriber
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Library code only emits events; the binary installs subscribers
//! - Metric calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;

//! Single-target reachability probing.
//!
//! # Data Flow
//! ```text
//! Target (uri, headers, timeout)
//!     → address.rs (bound the request by the effective timeout)
//!     → client.rs (HttpClient capability issues one GET)
//!     → ProbeResult { success: status == 200 }
//! ```
//!
//! # Design Decisions
//! - The HTTP client is injected; the probe only needs "GET with headers and timeout"
//! - Every failure (DNS, refused, non-200, timeout) collapses to `success = false`
//! - Errors are logged where they happen and never escape the probe

pub mod address;
pub mod client;
pub mod target;

pub use address::AddressProbe;
pub use client::{HttpClient, ProbeError, ReqwestClient};
pub use target::{ProbeResult, Target};

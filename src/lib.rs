//! Dual-path public IP detection for dynamic DNS clients.
//!
//! This crate detects the host's current public IP address over the network
//! using one of several pluggable detection protocols, and races a primary
//! and an alternative endpoint concurrently so that selective blocking of
//! one endpoint does not cost its full timeout on every detection cycle.

// Project modules
pub mod detection;
pub mod family;
pub mod logging;
pub mod settings;
pub mod transport;

// Re-exports for the binary and for integration tests.
pub use detection::race::types::RaceDetector;
pub use detection::traits::Protocol;
pub use detection::types::{DetectMethod, DetectedIp};
pub use family::types::IpFamily;
pub use logging::types::{DiagLevel, Reporter};

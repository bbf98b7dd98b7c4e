// Standard library
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

// 3rd party crates
use tokio::sync::RwLock;

// Project imports
use crate::detection::traits::Protocol;
use crate::detection::types::DetectMethod;
use crate::family::types::IpFamily;
use crate::logging::types::Reporter;

/// Races a protocol's primary and alternative endpoints and remembers the
/// winner per IP family.
///
/// The memo is owned by this instance and mutated only from the
/// coordinator's own controlling task, exactly once per family, the first
/// time a race resolves. It never expires; only a process restart clears
/// it. Once a family has a remembered winner, later detections call that
/// endpoint directly without racing.
pub struct RaceDetector {
    pub(super) protocol: Arc<dyn Protocol>,
    pub(super) memo: RwLock<HashMap<IpFamily, DetectMethod>>,
}

/// What one concurrent attempt reports back to the coordinator.
pub(super) struct AttemptOutcome {
    pub method: DetectMethod,
    pub ip: Option<IpAddr>,
    pub log: Reporter,
}

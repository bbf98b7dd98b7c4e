// Standard library
use std::net::IpAddr;

// 3rd party crates
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

// Project imports
use crate::family::types::IpFamily;
use crate::logging::types::Reporter;

// Current module imports
use super::types::DetectMethod;

/// Capability contract every detection protocol implements.
///
/// Protocols are constructed once from configuration and are immutable
/// afterwards; their endpoint tables are read-only and they share no
/// mutable state with each other, so one instance may serve arbitrarily
/// many concurrent detection attempts.
///
/// # Failure policy
///
/// `get_ip` never panics on malformed network input. Every failure path
/// writes exactly one line to `reporter` describing the cause, then
/// returns `None`. Configuration mistakes and impossible internal states
/// log at error severity; transient network trouble and protocol
/// violations log at warn severity.
#[async_trait]
pub trait Protocol: Send + Sync {
    /// Stable identifier used in logging and configuration.
    fn name(&self) -> &'static str;

    /// Whether an alternative endpoint exists for the family. Drives
    /// whether the coordinator races at all.
    fn has_alternative(&self, family: IpFamily) -> bool;

    /// Performs one detection attempt over the given method's endpoint.
    ///
    /// Implementations must observe `cancel` in their network operations;
    /// a cancelled attempt returns `None` promptly.
    async fn get_ip(
        &self,
        cancel: &CancellationToken,
        reporter: &Reporter,
        family: IpFamily,
        method: DetectMethod,
    ) -> Option<IpAddr>;
}

// Standard library
use std::collections::HashMap;
use std::net::IpAddr;

// 3rd party crates
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

// Project imports
use crate::detection::traits::Protocol;
use crate::detection::types::DetectMethod;
use crate::family::functions::normalize;
use crate::family::types::IpFamily;
use crate::logging::types::Reporter;

/// Returns one fixed, pre-validated address regardless of family table
/// lookups. No network I/O. Used for diagnostics and for user-supplied
/// literal IP configuration.
pub struct ConstantIp {
    ip: IpAddr,
}

impl ConstantIp {
    pub fn new(ip: IpAddr) -> Self {
        Self { ip }
    }
}

#[async_trait]
impl Protocol for ConstantIp {
    fn name(&self) -> &'static str {
        "constant"
    }

    fn has_alternative(&self, _family: IpFamily) -> bool {
        false
    }

    async fn get_ip(
        &self,
        _cancel: &CancellationToken,
        reporter: &Reporter,
        family: IpFamily,
        _method: DetectMethod,
    ) -> Option<IpAddr> {
        match normalize(family, self.ip) {
            Ok(ip) => Some(ip),
            Err(error) => {
                reporter.error(format!("configured literal address rejected: {}", error));
                None
            }
        }
    }
}

/// Per-family set of fixed, pre-validated addresses. No network I/O.
pub struct StaticMap {
    ips: HashMap<IpFamily, IpAddr>,
}

impl StaticMap {
    pub fn new(ips: HashMap<IpFamily, IpAddr>) -> Self {
        Self { ips }
    }
}

#[async_trait]
impl Protocol for StaticMap {
    fn name(&self) -> &'static str {
        "static"
    }

    fn has_alternative(&self, _family: IpFamily) -> bool {
        false
    }

    async fn get_ip(
        &self,
        _cancel: &CancellationToken,
        reporter: &Reporter,
        family: IpFamily,
        _method: DetectMethod,
    ) -> Option<IpAddr> {
        let Some(&ip) = self.ips.get(&family) else {
            reporter.error(format!("no literal {} address is configured", family));
            return None;
        };
        match normalize(family, ip) {
            Ok(ip) => Some(ip),
            Err(error) => {
                reporter.error(format!("configured literal address rejected: {}", error));
                None
            }
        }
    }
}

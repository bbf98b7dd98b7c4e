// Standard library
use std::collections::HashMap;
use std::net::IpAddr;

// 3rd party crates
use async_trait::async_trait;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

// Project imports
use crate::detection::constants::{UDP_PROBE_REMOTE_V4, UDP_PROBE_REMOTE_V6};
use crate::detection::switch::Endpoint;
use crate::detection::traits::Protocol;
use crate::detection::types::DetectMethod;
use crate::family::functions::normalize;
use crate::family::types::IpFamily;
use crate::logging::types::Reporter;

/// Discovers the outbound-facing local address by connecting a UDP socket
/// toward a well-known remote and reading back the OS-assigned source
/// address. No datagram is ever sent; the connect only performs the route
/// lookup.
pub struct UdpProbe {
    remotes: HashMap<IpFamily, Endpoint>,
}

impl UdpProbe {
    pub fn new() -> Self {
        let mut remotes = HashMap::new();
        remotes.insert(IpFamily::V4, Endpoint::constant(UDP_PROBE_REMOTE_V4));
        remotes.insert(IpFamily::V6, Endpoint::constant(UDP_PROBE_REMOTE_V6));
        Self { remotes }
    }
}

impl Default for UdpProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Protocol for UdpProbe {
    fn name(&self) -> &'static str {
        "udp"
    }

    fn has_alternative(&self, _family: IpFamily) -> bool {
        false
    }

    async fn get_ip(
        &self,
        cancel: &CancellationToken,
        reporter: &Reporter,
        family: IpFamily,
        method: DetectMethod,
    ) -> Option<IpAddr> {
        let Some(remote) = self.remotes.get(&family) else {
            reporter.error(format!(
                "no {} remote in the UDP probe table; this is a bug",
                family
            ));
            return None;
        };
        let remote = remote.resolve(method);

        let bind_addr = match family {
            IpFamily::V4 => "0.0.0.0:0",
            IpFamily::V6 => "[::]:0",
        };
        let socket = match UdpSocket::bind(bind_addr).await {
            Ok(socket) => socket,
            Err(error) => {
                reporter.warn(format!("binding a {} UDP socket failed: {}", family, error));
                return None;
            }
        };

        let connected = tokio::select! {
            () = cancel.cancelled() => {
                reporter.debug(format!("UDP probe toward {} cancelled", remote));
                return None;
            }
            result = socket.connect(remote) => result,
        };
        if let Err(error) = connected {
            reporter.warn(format!(
                "connecting a UDP socket toward {} failed: {}",
                remote, error
            ));
            return None;
        }

        let local = match socket.local_addr() {
            Ok(local) => local,
            Err(error) => {
                reporter.warn(format!(
                    "reading the local address of the UDP socket failed: {}",
                    error
                ));
                return None;
            }
        };

        match normalize(family, local.ip()) {
            Ok(ip) => Some(ip),
            Err(error) => {
                reporter.warn(format!(
                    "the OS assigned an unusable local address: {}",
                    error
                ));
                None
            }
        }
    }
}

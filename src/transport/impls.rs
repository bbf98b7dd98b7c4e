// Standard library
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

// 3rd party crates
use reqwest::Client;
use tracing::debug;

// Project imports
use crate::family::types::IpFamily;

// Current module imports
use super::errors::TransportError;
use super::types::TransportSet;

impl TransportSet {
    /// Builds the IPv4-only and IPv6-only clients.
    ///
    /// Binding the local address to the family's unspecified address makes
    /// the connector dial only sockets of that family, so a host name that
    /// resolves to both families cannot leak a probe onto the wrong one.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let v4 = Self::build_client(timeout, IpAddr::V4(Ipv4Addr::UNSPECIFIED))
            .map_err(|source| TransportError::ClientBuild {
                family: IpFamily::V4,
                source,
            })?;
        let v6 = Self::build_client(timeout, IpAddr::V6(Ipv6Addr::UNSPECIFIED))
            .map_err(|source| TransportError::ClientBuild {
                family: IpFamily::V6,
                source,
            })?;
        Ok(Self { v4, v6 })
    }

    fn build_client(timeout: Duration, local: IpAddr) -> Result<Client, reqwest::Error> {
        Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .local_address(local)
            .build()
    }

    /// The client restricted to the given family's sockets.
    pub fn client(&self, family: IpFamily) -> &Client {
        match family {
            IpFamily::V4 => &self.v4,
            IpFamily::V6 => &self.v6,
        }
    }

    /// Tears the transports down, closing any idle pooled connections.
    /// Call once at process shutdown.
    pub fn shutdown(self) {
        debug!("HTTP transports shut down, idle connections closed");
    }
}

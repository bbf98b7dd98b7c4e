// Standard library
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

/// Scans the addresses bound to a named network interface.
///
/// Unspecified, loopback, interface-local multicast and link-local
/// addresses are skipped. The first global-unicast address wins; if none
/// exists, the first remaining address with a scope larger than link-local
/// is used with a warning, since that is a degraded but possibly intended
/// choice.
pub struct IfaceScan {
    interface: String,
}

impl IfaceScan {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
        }
    }

    #[cfg(unix)]
    fn scan(&self, reporter: &Reporter, family: IpFamily) -> Option<IpAddr> {
        let entries = match nix::ifaddrs::getifaddrs() {
            Ok(entries) => entries,
            Err(error) => {
                reporter.error(format!(
                    "enumerating network interfaces failed: {}",
                    error
                ));
                return None;
            }
        };

        let mut interface_exists = false;
        let mut candidates: Vec<IpAddr> = Vec::new();
        for entry in entries {
            if entry.interface_name != self.interface {
                continue;
            }
            interface_exists = true;
            let Some(address) = entry.address else {
                continue;
            };
            let ip = if let Some(sin) = address.as_sockaddr_in() {
                IpAddr::V4(sin.ip())
            } else if let Some(sin6) = address.as_sockaddr_in6() {
                IpAddr::V6(sin6.ip())
            } else {
                continue;
            };
            if family.matches(&ip) && !skip_address(&ip) {
                candidates.push(ip);
            }
        }

        if !interface_exists {
            reporter.error(format!("interface \"{}\" does not exist", self.interface));
            return None;
        }

        let chosen = match candidates.iter().find(|ip| is_global_unicast(ip)) {
            Some(ip) => *ip,
            None => match candidates.first() {
                Some(ip) => {
                    reporter.warn(format!(
                        "no global unicast {} address on interface \"{}\"; falling back to {}",
                        family, self.interface, ip
                    ));
                    *ip
                }
                None => {
                    reporter.warn(format!(
                        "interface \"{}\" has no usable {} address",
                        self.interface, family
                    ));
                    return None;
                }
            },
        };

        match normalize(family, chosen) {
            Ok(ip) => Some(ip),
            Err(error) => {
                reporter.error(format!(
                    "interface \"{}\" produced an unusable address: {}",
                    self.interface, error
                ));
                None
            }
        }
    }

    #[cfg(not(unix))]
    fn scan(&self, reporter: &Reporter, _family: IpFamily) -> Option<IpAddr> {
        reporter.error("interface scanning is not supported on this platform".to_string());
        None
    }
}

#[async_trait]
impl Protocol for IfaceScan {
    fn name(&self) -> &'static str {
        "interface"
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
        self.scan(reporter, family)
    }
}

/// Addresses that can never serve as a detection result: unspecified,
/// loopback, interface-local multicast, and anything link-local.
fn skip_address(ip: &IpAddr) -> bool {
    if ip.is_unspecified() || ip.is_loopback() {
        return true;
    }
    match ip {
        IpAddr::V4(v4) => {
            // 169.254.0.0/16 and the 224.0.0.0/24 local-network multicast
            // block.
            let octets = v4.octets();
            v4.is_link_local() || (octets[0] == 224 && octets[1] == 0 && octets[2] == 0)
        }
        IpAddr::V6(v6) => {
            let segments = v6.segments();
            // fe80::/10 unicast, plus multicast with interface-local (1)
            // or link-local (2) scope.
            (segments[0] & 0xffc0) == 0xfe80
                || (v6.is_multicast() && (segments[0] & 0x000f) <= 2)
        }
    }
}

fn is_global_unicast(ip: &IpAddr) -> bool {
    !ip.is_multicast() && !skip_address(ip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_special_addresses() {
        for text in [
            "0.0.0.0",
            "127.0.0.1",
            "169.254.1.1",
            "224.0.0.251",
            "::",
            "::1",
            "fe80::1",
            "ff01::1",
            "ff02::fb",
        ] {
            let ip: IpAddr = text.parse().unwrap();
            assert!(skip_address(&ip), "{} should be skipped", text);
        }
    }

    #[test]
    fn keeps_usable_addresses() {
        for text in ["203.0.113.7", "10.0.0.2", "2001:db8::1", "fd00::1"] {
            let ip: IpAddr = text.parse().unwrap();
            assert!(!skip_address(&ip), "{} should be kept", text);
            assert!(is_global_unicast(&ip), "{} should be global unicast", text);
        }
    }

    #[test]
    fn wider_scope_multicast_is_kept_but_not_global_unicast() {
        let ip: IpAddr = "ff05::2".parse().unwrap();
        assert!(!skip_address(&ip));
        assert!(!is_global_unicast(&ip));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unknown_interface_is_a_user_error() {
        use crate::logging::types::{LogSink, MemorySink};
        use std::sync::Arc;

        let sink = Arc::new(MemorySink::default());
        let reporter = Reporter::new(sink.clone() as Arc<dyn LogSink>);
        let cancel = CancellationToken::new();
        let protocol = IfaceScan::new("does-not-exist0");

        let ip = protocol
            .get_ip(&cancel, &reporter, IpFamily::V4, DetectMethod::Primary)
            .await;
        assert_eq!(ip, None);
        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, crate::logging::types::DiagLevel::Error);
        assert!(entries[0].message.contains("does not exist"));
    }
}

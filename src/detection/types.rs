// Standard library
use std::net::IpAddr;

// 3rd party crates
use serde::Deserialize;

// Current module imports
use super::constants::{default_families, default_protocol, default_timeout};

/// Which endpoint a detection attempt used.
///
/// `Unspecified` is the zero value; it is never a valid success outcome and
/// only appears while no endpoint has been chosen yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectMethod {
    Unspecified,
    Primary,
    Alternative,
}

/// A successfully detected address together with the endpoint that
/// answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedIp {
    pub ip: IpAddr,
    pub method: DetectMethod,
}

/// Detection configuration as it appears in the settings file.
#[derive(Debug, Deserialize, Clone)]
pub struct DetectionConfig {
    /// Protocol used to detect the public address. One of "doh", "http",
    /// "trace", "regex", "udp", "interface" or "static".
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Families to detect ("ipv4", "ipv6").
    #[serde(default = "default_families")]
    pub families: Vec<String>,

    /// Endpoint URL override for the "http" and "regex" protocols.
    #[serde(default)]
    pub url: Option<String>,

    /// Capture pattern for the "regex" protocol. Group 1 must capture the
    /// address.
    #[serde(default)]
    pub pattern: Option<String>,

    /// Interface name for the "interface" protocol.
    #[serde(default)]
    pub interface: Option<String>,

    /// Literal addresses for the "static" protocol.
    #[serde(default)]
    pub ipv4: Option<String>,
    #[serde(default)]
    pub ipv6: Option<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            timeout: default_timeout(),
            families: default_families(),
            url: None,
            pattern: None,
            interface: None,
            ipv4: None,
            ipv6: None,
        }
    }
}

// Standard library
use std::collections::HashMap;
use std::sync::Arc;

// 3rd party crates
use regex::Regex;

// Project imports
use crate::family::functions::parse_address;
use crate::family::types::IpFamily;
use crate::transport::types::TransportSet;

// Current module imports
use super::errors::DetectionValidationError;
use super::protocols::{ConstantIp, DnsOverHttps, Extract, HttpBody, IfaceScan, StaticMap, UdpProbe};
use super::traits::Protocol;
use super::types::DetectionConfig;

/// Builds the configured detection protocol.
///
/// The configuration must have passed [`DetectionConfig::validate`]; the
/// checks here only re-surface what validation already guarantees.
pub fn build_protocol(
    config: &DetectionConfig,
    transports: Arc<TransportSet>,
) -> Result<Arc<dyn Protocol>, DetectionValidationError> {
    let protocol: Arc<dyn Protocol> = match config.protocol.as_str() {
        "doh" => Arc::new(DnsOverHttps::new(transports)),
        "http" => match &config.url {
            Some(url) => Arc::new(HttpBody::with_url(transports, url.clone())),
            None => Arc::new(HttpBody::new(transports)),
        },
        "trace" => Arc::new(Extract::cloudflare_trace(transports)),
        "regex" => {
            let pattern = config
                .pattern
                .as_deref()
                .ok_or(DetectionValidationError::MissingPattern)?;
            let pattern = Regex::new(pattern).map_err(|source| {
                DetectionValidationError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                }
            })?;
            let url = config
                .url
                .clone()
                .unwrap_or_else(|| super::constants::TRACE_URL_V4_PRIMARY.to_string());
            Arc::new(Extract::with_regex(transports, url, pattern))
        }
        "udp" => Arc::new(UdpProbe::new()),
        "interface" => {
            let interface = config
                .interface
                .as_deref()
                .ok_or(DetectionValidationError::MissingInterface)?;
            Arc::new(IfaceScan::new(interface))
        }
        "static" => {
            let mut ips = HashMap::new();
            if let Some(literal) = config.ipv4.as_deref() {
                ips.insert(IpFamily::V4, parse_address(IpFamily::V4, literal)?);
            }
            if let Some(literal) = config.ipv6.as_deref() {
                ips.insert(IpFamily::V6, parse_address(IpFamily::V6, literal)?);
            }
            // A single literal serves the plain-constant case too.
            if let (1, Some(&ip)) = (ips.len(), ips.values().next()) {
                Arc::new(ConstantIp::new(ip))
            } else {
                Arc::new(StaticMap::new(ips))
            }
        }
        other => {
            return Err(DetectionValidationError::UnknownProtocol(other.to_string()));
        }
    };
    Ok(protocol)
}

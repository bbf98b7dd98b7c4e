//! Detection protocol implementations.
//!
//! Each protocol owns its own endpoint table and extraction logic; they
//! share no mutable state. HTTP-based protocols delegate the round trip to
//! the shared wire adapter in [`crate::transport`].

pub mod constant;
pub mod doh;
pub mod extract;
pub mod http_body;
pub mod iface;
pub mod udp_probe;

pub use constant::{ConstantIp, StaticMap};
pub use doh::DnsOverHttps;
pub use extract::Extract;
pub use http_body::HttpBody;
pub use iface::IfaceScan;
pub use udp_probe::UdpProbe;

const BODY_PREVIEW_LEN: usize = 120;

/// Truncated, escaped rendering of a response body for diagnostics.
pub(super) fn body_preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut preview: String = text.chars().take(BODY_PREVIEW_LEN).collect();
    if text.chars().count() > BODY_PREVIEW_LEN {
        preview.push('…');
    }
    preview.escape_default().to_string()
}

// Standard library
use std::time::Duration;

/// How long the race coordinator waits before starting the alternative
/// endpoint's attempt. Deliberately longer than classic happy-eyeballs
/// guidance: the two endpoints are not plain mirrors and may have
/// materially different latency and availability profiles.
pub const ALTERNATIVE_START_DELAY: Duration = Duration::from_millis(500);

/// MIME type of a binary DNS message carried over HTTPS.
pub const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

/// Name whose CHAOS-class TXT record answers with the resolver-observed
/// client address.
pub const DOH_QUERY_NAME: &str = "whoami.cloudflare";

/// DNS-over-HTTPS resolver endpoints
pub const DOH_URL_V4_PRIMARY: &str = "https://1.1.1.1/dns-query";
pub const DOH_URL_V4_ALTERNATIVE: &str = "https://1.0.0.1/dns-query";
pub const DOH_URL_V6_PRIMARY: &str = "https://[2606:4700:4700::1111]/dns-query";
pub const DOH_URL_V6_ALTERNATIVE: &str = "https://[2606:4700:4700::1001]/dns-query";

/// Plain HTTP body endpoints
pub const HTTP_URL_V4_PRIMARY: &str = "https://api.ipify.org";
pub const HTTP_URL_V4_ALTERNATIVE: &str = "https://ipv4.icanhazip.com";
pub const HTTP_URL_V6_PRIMARY: &str = "https://api6.ipify.org";
pub const HTTP_URL_V6_ALTERNATIVE: &str = "https://ipv6.icanhazip.com";

/// Connection trace endpoints (`field=value` lines, address under "ip")
pub const TRACE_URL_V4_PRIMARY: &str = "https://1.1.1.1/cdn-cgi/trace";
pub const TRACE_URL_V4_ALTERNATIVE: &str = "https://1.0.0.1/cdn-cgi/trace";
pub const TRACE_URL_V6_PRIMARY: &str = "https://[2606:4700:4700::1111]/cdn-cgi/trace";
pub const TRACE_URL_V6_ALTERNATIVE: &str = "https://[2606:4700:4700::1001]/cdn-cgi/trace";
pub const TRACE_IP_FIELD: &str = "ip";

/// Remote addresses the UDP source-address probe connects toward. No
/// datagram is ever sent; the remote only anchors the local route lookup.
pub const UDP_PROBE_REMOTE_V4: &str = "1.1.1.1:443";
pub const UDP_PROBE_REMOTE_V6: &str = "[2606:4700:4700::1111]:443";

pub fn default_protocol() -> String {
    "doh".to_string()
}

pub fn default_timeout() -> u64 {
    crate::transport::constants::DEFAULT_REQUEST_TIMEOUT_SECS
}

pub fn default_families() -> Vec<String> {
    vec!["ipv4".to_string(), "ipv6".to_string()]
}

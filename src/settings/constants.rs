/// Example configuration
pub const DEFAULT_CONFIG: &str = r#"
# Logging configuration
[log]
# Level can be "error", "warn", "info", "debug", or "trace"
level = "info"

# Public IP detection configuration
[detection]
# Protocol used to detect the public address. One of:
#   "doh"       - DNS-over-HTTPS TXT query (default)
#   "http"      - plain HTTP body
#   "trace"     - connection trace page (field=value lines)
#   "regex"     - custom pattern applied to an HTTP body (needs `pattern`)
#   "udp"       - local UDP source-address probe (no remote service)
#   "interface" - scan a local network interface (needs `interface`)
#   "static"    - fixed literal addresses (needs `ipv4` and/or `ipv6`)
protocol = "doh"

# HTTP request timeout in seconds
timeout = 5

# Families to detect
families = ["ipv4", "ipv6"]

# protocol = "regex" example:
# url = "https://ip.example.com/status"
# pattern = 'address: (\S+)'

# protocol = "interface" example:
# interface = "eth0"

# protocol = "static" example:
# ipv4 = "203.0.113.7"
# ipv6 = "2001:db8::7"
"#;

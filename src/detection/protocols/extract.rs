// Standard library
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

// 3rd party crates
use async_trait::async_trait;
use regex::Regex;
use tokio_util::sync::CancellationToken;

// Project imports
use crate::detection::constants::{
    TRACE_IP_FIELD, TRACE_URL_V4_ALTERNATIVE, TRACE_URL_V4_PRIMARY, TRACE_URL_V6_ALTERNATIVE,
    TRACE_URL_V6_PRIMARY,
};
use crate::detection::switch::Endpoint;
use crate::detection::traits::Protocol;
use crate::detection::types::DetectMethod;
use crate::family::functions::parse_address;
use crate::family::types::IpFamily;
use crate::logging::types::Reporter;
use crate::transport::functions::fetch_and_extract;
use crate::transport::types::{FetchRequest, TransportSet};

// Current module imports
use super::body_preview;

/// Sends a GET and extracts the address from the body with a compiled
/// pattern whose capture group 1 holds the candidate.
///
/// Covers both user-supplied regexes and `field=value` line responses such
/// as connection trace pages.
pub struct Extract {
    name: &'static str,
    transports: Arc<TransportSet>,
    endpoints: HashMap<IpFamily, Endpoint>,
    pattern: Regex,
}

impl Extract {
    /// User-supplied pattern against a single URL for both families.
    pub fn with_regex(
        transports: Arc<TransportSet>,
        url: impl Into<String>,
        pattern: Regex,
    ) -> Self {
        let url = url.into();
        let mut endpoints = HashMap::new();
        endpoints.insert(IpFamily::V4, Endpoint::constant(url.clone()));
        endpoints.insert(IpFamily::V6, Endpoint::constant(url));
        Self {
            name: "regex",
            transports,
            endpoints,
            pattern,
        }
    }

    /// The default connection-trace endpoints, matching the `ip=` line.
    pub fn cloudflare_trace(transports: Arc<TransportSet>) -> Self {
        let mut endpoints = HashMap::new();
        endpoints.insert(
            IpFamily::V4,
            Endpoint::switchable(TRACE_URL_V4_PRIMARY, TRACE_URL_V4_ALTERNATIVE),
        );
        endpoints.insert(
            IpFamily::V6,
            Endpoint::switchable(TRACE_URL_V6_PRIMARY, TRACE_URL_V6_ALTERNATIVE),
        );
        Self {
            name: "trace",
            transports,
            endpoints,
            pattern: Self::field_pattern(TRACE_IP_FIELD),
        }
    }

    pub fn with_endpoints(
        transports: Arc<TransportSet>,
        endpoints: HashMap<IpFamily, Endpoint>,
        pattern: Regex,
    ) -> Self {
        Self {
            name: "regex",
            transports,
            endpoints,
            pattern,
        }
    }

    /// Pattern matching one `field=value` line.
    ///
    /// The pattern is built from a fixed template around an escaped field
    /// name, so it always compiles.
    fn field_pattern(field: &str) -> Regex {
        Regex::new(&format!(r"(?m)^{}=(\S+)$", regex::escape(field)))
            .expect("field pattern template must compile")
    }
}

#[async_trait]
impl Protocol for Extract {
    fn name(&self) -> &'static str {
        self.name
    }

    fn has_alternative(&self, family: IpFamily) -> bool {
        self.endpoints
            .get(&family)
            .map(Endpoint::has_alternative)
            .unwrap_or(false)
    }

    async fn get_ip(
        &self,
        cancel: &CancellationToken,
        reporter: &Reporter,
        family: IpFamily,
        method: DetectMethod,
    ) -> Option<IpAddr> {
        let Some(endpoint) = self.endpoints.get(&family) else {
            reporter.error(format!(
                "no {} endpoint in the {} table; this is a bug",
                family, self.name
            ));
            return None;
        };
        let url = endpoint.resolve(method);

        fetch_and_extract(
            self.transports.client(family),
            cancel,
            reporter,
            FetchRequest::get(url),
            |reporter, body| {
                let text = String::from_utf8_lossy(body);
                let Some(captures) = self.pattern.captures(&text) else {
                    reporter.warn(format!(
                        "pattern {} matched nothing in the response from {}: \"{}\"",
                        self.pattern,
                        url,
                        body_preview(body)
                    ));
                    return None;
                };
                let matched = captures.get(1).map_or("", |group| group.as_str());
                match parse_address(family, matched) {
                    Ok(ip) => Some(ip),
                    Err(error) => {
                        reporter.warn(format!(
                            "matched \"{}\" in the response from {}, but: {}",
                            matched, url, error
                        ));
                        None
                    }
                }
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_pattern_matches_a_trace_body() {
        let pattern = Extract::field_pattern("ip");
        let body = "fl=123\nh=example.test\nip=203.0.113.7\nts=1700000000\n";
        let captures = pattern.captures(body).unwrap();
        assert_eq!(&captures[1], "203.0.113.7");
    }

    #[test]
    fn field_pattern_escapes_the_field_name() {
        let pattern = Extract::field_pattern("a.b");
        assert!(pattern.captures("axb=1.2.3.4\n").is_none());
        assert!(pattern.captures("a.b=1.2.3.4\n").is_some());
    }
}

// Standard library
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

// 3rd party crates
use async_trait::async_trait;
use reqwest::Method;
use tokio_util::sync::CancellationToken;

// Project imports
use crate::detection::constants::{
    DNS_MESSAGE_CONTENT_TYPE, DOH_QUERY_NAME, DOH_URL_V4_ALTERNATIVE, DOH_URL_V4_PRIMARY,
    DOH_URL_V6_ALTERNATIVE, DOH_URL_V6_PRIMARY,
};
use crate::detection::dns::message::{build_txt_query, parse_txt_response};
use crate::detection::switch::Endpoint;
use crate::detection::traits::Protocol;
use crate::detection::types::DetectMethod;
use crate::family::functions::parse_address;
use crate::family::types::IpFamily;
use crate::logging::types::Reporter;
use crate::transport::functions::fetch_and_extract;
use crate::transport::types::{FetchRequest, TransportSet};

/// Asks a DNS-over-HTTPS resolver for the CHAOS-class TXT record that
/// carries the resolver-observed client address.
///
/// The query is a binary DNS message with a pseudo-random transaction id,
/// POSTed with the `application/dns-message` media type; the response is
/// validated strictly against the query (see
/// [`parse_txt_response`]).
pub struct DnsOverHttps {
    query_name: String,
    transports: Arc<TransportSet>,
    endpoints: HashMap<IpFamily, Endpoint>,
}

impl DnsOverHttps {
    /// The default resolver endpoints.
    pub fn new(transports: Arc<TransportSet>) -> Self {
        let mut endpoints = HashMap::new();
        endpoints.insert(
            IpFamily::V4,
            Endpoint::switchable(DOH_URL_V4_PRIMARY, DOH_URL_V4_ALTERNATIVE),
        );
        endpoints.insert(
            IpFamily::V6,
            Endpoint::switchable(DOH_URL_V6_PRIMARY, DOH_URL_V6_ALTERNATIVE),
        );
        Self::with_endpoints(transports, DOH_QUERY_NAME, endpoints)
    }

    pub fn with_endpoints(
        transports: Arc<TransportSet>,
        query_name: impl Into<String>,
        endpoints: HashMap<IpFamily, Endpoint>,
    ) -> Self {
        Self {
            query_name: query_name.into(),
            transports,
            endpoints,
        }
    }
}

#[async_trait]
impl Protocol for DnsOverHttps {
    fn name(&self) -> &'static str {
        "doh"
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
                "no {} endpoint in the DNS-over-HTTPS table; this is a bug",
                family
            ));
            return None;
        };
        let url = endpoint.resolve(method);

        let id: u16 = rand::random();
        let query = build_txt_query(id, &self.query_name);
        let request = FetchRequest {
            method: Method::POST,
            url,
            body: Some(query),
            content_type: Some(DNS_MESSAGE_CONTENT_TYPE),
            accept: Some(DNS_MESSAGE_CONTENT_TYPE),
        };

        fetch_and_extract(
            self.transports.client(family),
            cancel,
            reporter,
            request,
            |reporter, body| {
                let text = match parse_txt_response(id, &self.query_name, body) {
                    Ok(text) => text,
                    Err(error) => {
                        reporter.warn(format!("invalid DNS response from {}: {}", url, error));
                        return None;
                    }
                };
                match parse_address(family, &text) {
                    Ok(ip) => Some(ip),
                    Err(error) => {
                        reporter.warn(format!(
                            "TXT record from {} is not usable: {}",
                            url, error
                        ));
                        None
                    }
                }
            },
        )
        .await
    }
}

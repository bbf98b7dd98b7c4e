// Standard library
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

// 3rd party crates
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

// Project imports
use crate::detection::constants::{
    HTTP_URL_V4_ALTERNATIVE, HTTP_URL_V4_PRIMARY, HTTP_URL_V6_ALTERNATIVE, HTTP_URL_V6_PRIMARY,
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

/// Sends a GET and parses the entire response body as a literal address.
pub struct HttpBody {
    transports: Arc<TransportSet>,
    endpoints: HashMap<IpFamily, Endpoint>,
}

impl HttpBody {
    /// The default public endpoints.
    pub fn new(transports: Arc<TransportSet>) -> Self {
        let mut endpoints = HashMap::new();
        endpoints.insert(
            IpFamily::V4,
            Endpoint::switchable(HTTP_URL_V4_PRIMARY, HTTP_URL_V4_ALTERNATIVE),
        );
        endpoints.insert(
            IpFamily::V6,
            Endpoint::switchable(HTTP_URL_V6_PRIMARY, HTTP_URL_V6_ALTERNATIVE),
        );
        Self {
            transports,
            endpoints,
        }
    }

    /// A single user-supplied URL serving both families.
    pub fn with_url(transports: Arc<TransportSet>, url: impl Into<String>) -> Self {
        let url = url.into();
        let mut endpoints = HashMap::new();
        endpoints.insert(IpFamily::V4, Endpoint::constant(url.clone()));
        endpoints.insert(IpFamily::V6, Endpoint::constant(url));
        Self {
            transports,
            endpoints,
        }
    }

    pub fn with_endpoints(
        transports: Arc<TransportSet>,
        endpoints: HashMap<IpFamily, Endpoint>,
    ) -> Self {
        Self {
            transports,
            endpoints,
        }
    }
}

#[async_trait]
impl Protocol for HttpBody {
    fn name(&self) -> &'static str {
        "http"
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
                "no {} endpoint in the http table; this is a bug",
                family
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
                match parse_address(family, &text) {
                    Ok(ip) => Some(ip),
                    Err(error) => {
                        reporter.warn(format!(
                            "response body from {} is not an address ({}): \"{}\"",
                            url,
                            error,
                            body_preview(body)
                        ));
                        None
                    }
                }
            },
        )
        .await
    }
}

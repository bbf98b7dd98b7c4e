// 3rd party crates
use reqwest::{Client, Method};

/// Process-wide pair of family-restricted HTTP clients.
///
/// Built once at startup, immutable afterwards, and shared read-only across
/// arbitrarily many concurrent detection attempts. [`shutdown`] is meant to
/// be called once at process exit, not per detection.
///
/// [`shutdown`]: TransportSet::shutdown
pub struct TransportSet {
    pub(super) v4: Client,
    pub(super) v6: Client,
}

/// One outbound request handed to the wire adapter.
pub struct FetchRequest<'a> {
    pub method: Method,
    pub url: &'a str,
    pub body: Option<Vec<u8>>,
    pub content_type: Option<&'a str>,
    pub accept: Option<&'a str>,
}

impl<'a> FetchRequest<'a> {
    /// Plain GET with no body or extra headers.
    pub fn get(url: &'a str) -> Self {
        Self {
            method: Method::GET,
            url,
            body: None,
            content_type: None,
            accept: None,
        }
    }
}

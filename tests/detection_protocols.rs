//! End-to-end protocol tests against local HTTP responders.

mod common;

// Standard library
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

// 3rd party crates
use regex::Regex;
use tokio_util::sync::CancellationToken;

// Project imports
use niloofar_ddns::detection::protocols::{DnsOverHttps, Extract, HttpBody};
use niloofar_ddns::detection::switch::Endpoint;
use niloofar_ddns::detection::traits::Protocol;
use niloofar_ddns::detection::types::DetectMethod;
use niloofar_ddns::family::types::IpFamily;
use niloofar_ddns::logging::types::{LogSink, MemorySink, Reporter};
use niloofar_ddns::transport::types::TransportSet;

use common::{dns_txt_response, spawn_http_server};

fn transports() -> Arc<TransportSet> {
    Arc::new(TransportSet::new(Duration::from_secs(2)).unwrap())
}

fn memory_reporter() -> (Arc<MemorySink>, Reporter) {
    let sink = Arc::new(MemorySink::default());
    let reporter = Reporter::new(sink.clone() as Arc<dyn LogSink>);
    (sink, reporter)
}

fn single_endpoint(url: String) -> HashMap<IpFamily, Endpoint> {
    let mut endpoints = HashMap::new();
    endpoints.insert(IpFamily::V4, Endpoint::constant(url));
    endpoints
}

#[tokio::test(flavor = "multi_thread")]
async fn http_body_detects_from_a_plain_body() {
    let url = spawn_http_server(|_| ("text/plain", b"203.0.113.9\n".to_vec())).await;
    let protocol = HttpBody::with_endpoints(transports(), single_endpoint(url));
    let (_, reporter) = memory_reporter();

    let ip = protocol
        .get_ip(
            &CancellationToken::new(),
            &reporter,
            IpFamily::V4,
            DetectMethod::Primary,
        )
        .await;
    assert_eq!(ip, Some("203.0.113.9".parse().unwrap()));
}

#[tokio::test(flavor = "multi_thread")]
async fn http_body_rejects_a_cross_family_answer() {
    let url = spawn_http_server(|_| ("text/plain", b"2001:db8::1".to_vec())).await;
    let protocol = HttpBody::with_endpoints(transports(), single_endpoint(url));
    let (sink, reporter) = memory_reporter();

    let ip = protocol
        .get_ip(
            &CancellationToken::new(),
            &reporter,
            IpFamily::V4,
            DetectMethod::Primary,
        )
        .await;
    assert_eq!(ip, None);
    let messages = sink.messages();
    assert_eq!(messages.len(), 1);
    assert!(
        messages[0].contains("not a valid IPv4 address"),
        "unexpected message: {}",
        messages[0]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn extract_pulls_the_address_out_of_a_trace_body() {
    let url = spawn_http_server(|_| {
        (
            "text/plain",
            b"fl=123abc\nh=one.one.one.one\nip=203.0.113.10\nts=1700000000.123\n".to_vec(),
        )
    })
    .await;
    let pattern = Regex::new(r"(?m)^ip=(\S+)$").unwrap();
    let protocol = Extract::with_endpoints(transports(), single_endpoint(url), pattern);
    let (_, reporter) = memory_reporter();

    let ip = protocol
        .get_ip(
            &CancellationToken::new(),
            &reporter,
            IpFamily::V4,
            DetectMethod::Primary,
        )
        .await;
    assert_eq!(ip, Some("203.0.113.10".parse().unwrap()));
}

#[tokio::test(flavor = "multi_thread")]
async fn extract_reports_a_body_without_a_match() {
    let url = spawn_http_server(|_| ("text/plain", b"nothing to see here".to_vec())).await;
    let pattern = Regex::new(r"(?m)^ip=(\S+)$").unwrap();
    let protocol = Extract::with_endpoints(transports(), single_endpoint(url), pattern);
    let (sink, reporter) = memory_reporter();

    let ip = protocol
        .get_ip(
            &CancellationToken::new(),
            &reporter,
            IpFamily::V4,
            DetectMethod::Primary,
        )
        .await;
    assert_eq!(ip, None);
    assert!(sink.messages()[0].contains("matched nothing"));
}

#[tokio::test(flavor = "multi_thread")]
async fn doh_recovers_the_txt_encoded_address() {
    let url = spawn_http_server(|request| {
        ("application/dns-message", dns_txt_response(request, "203.0.113.77"))
    })
    .await;
    let protocol = DnsOverHttps::with_endpoints(transports(), "whoami.cloudflare", single_endpoint(url));
    let (_, reporter) = memory_reporter();

    let ip = protocol
        .get_ip(
            &CancellationToken::new(),
            &reporter,
            IpFamily::V4,
            DetectMethod::Primary,
        )
        .await;
    assert_eq!(ip, Some("203.0.113.77".parse().unwrap()));
}

#[tokio::test(flavor = "multi_thread")]
async fn doh_rejects_a_response_with_a_foreign_transaction_id() {
    let url = spawn_http_server(|request| {
        let mut payload = dns_txt_response(request, "203.0.113.77");
        // Spoof a different transaction id.
        payload[0] ^= 0xff;
        ("application/dns-message", payload)
    })
    .await;
    let protocol = DnsOverHttps::with_endpoints(transports(), "whoami.cloudflare", single_endpoint(url));
    let (sink, reporter) = memory_reporter();

    let ip = protocol
        .get_ip(
            &CancellationToken::new(),
            &reporter,
            IpFamily::V4,
            DetectMethod::Primary,
        )
        .await;
    assert_eq!(ip, None);
    let messages = sink.messages();
    assert_eq!(messages.len(), 1);
    assert!(
        messages[0].contains("transaction id"),
        "unexpected message: {}",
        messages[0]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn a_missing_family_in_the_table_is_an_internal_error() {
    let protocol = HttpBody::with_endpoints(transports(), HashMap::new());
    let (sink, reporter) = memory_reporter();

    let ip = protocol
        .get_ip(
            &CancellationToken::new(),
            &reporter,
            IpFamily::V6,
            DetectMethod::Primary,
        )
        .await;
    assert_eq!(ip, None);
    assert!(sink.messages()[0].contains("this is a bug"));
}

// Standard library
use std::net::IpAddr;
use std::time::Duration;

// 3rd party crates
use reqwest::Client;
use tokio_util::sync::CancellationToken;

// Project imports
use crate::logging::types::Reporter;

// Current module imports
use super::constants::{MAX_RETRIES, RETRY_DELAY_MS};
use super::types::FetchRequest;

/// Sends the request and hands the response body to the protocol-specific
/// extractor. This is the single outbound path shared by every HTTP-based
/// detection protocol.
///
/// Transient failures (send errors, 5xx answers, body-read errors) are
/// retried up to [`MAX_RETRIES`] extra attempts before the failure is
/// logged and surfaced as `None`. Request-construction failures are a
/// configuration problem and fail immediately. The whole operation observes
/// `cancel`; a cancelled fetch returns `None` with a debug line only.
pub async fn fetch_and_extract<F>(
    client: &Client,
    cancel: &CancellationToken,
    reporter: &Reporter,
    request: FetchRequest<'_>,
    extract: F,
) -> Option<IpAddr>
where
    F: Fn(&Reporter, &[u8]) -> Option<IpAddr>,
{
    let body = fetch_body(client, cancel, reporter, &request).await?;
    extract(reporter, &body)
}

/// Performs the request/response round trip with bounded retries, returning
/// the raw response body.
pub async fn fetch_body(
    client: &Client,
    cancel: &CancellationToken,
    reporter: &Reporter,
    request: &FetchRequest<'_>,
) -> Option<Vec<u8>> {
    let mut last_failure = String::new();

    for attempt in 0..=MAX_RETRIES {
        if attempt > 0 {
            reporter.debug(format!(
                "retrying {} (attempt {} of {}): {}",
                request.url,
                attempt + 1,
                MAX_RETRIES + 1,
                last_failure
            ));
            let backoff = tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS));
            tokio::select! {
                () = cancel.cancelled() => {
                    reporter.debug(format!("request to {} cancelled", request.url));
                    return None;
                }
                () = backoff => {}
            }
        }

        let mut builder = client.request(request.method.clone(), request.url);
        if let Some(content_type) = request.content_type {
            builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if let Some(accept) = request.accept {
            builder = builder.header(reqwest::header::ACCEPT, accept);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = tokio::select! {
            () = cancel.cancelled() => {
                reporter.debug(format!("request to {} cancelled", request.url));
                return None;
            }
            result = builder.send() => result,
        };

        let response = match response {
            Ok(response) => response,
            Err(error) if error.is_builder() => {
                reporter.error(format!(
                    "failed to construct the request to {}: {}",
                    request.url, error
                ));
                return None;
            }
            Err(error) => {
                last_failure = format!("sending the request failed: {}", error);
                continue;
            }
        };

        let status = response.status();
        if status.is_server_error() {
            last_failure = format!("server answered with status {}", status);
            continue;
        }
        if !status.is_success() {
            reporter.warn(format!(
                "querying {} failed: server answered with status {}",
                request.url, status
            ));
            return None;
        }

        let bytes = tokio::select! {
            () = cancel.cancelled() => {
                reporter.debug(format!("request to {} cancelled", request.url));
                return None;
            }
            result = response.bytes() => result,
        };
        match bytes {
            Ok(bytes) => return Some(bytes.to_vec()),
            Err(error) => {
                last_failure = format!("reading the response body failed: {}", error);
                continue;
            }
        }
    }

    reporter.warn(format!(
        "querying {} failed after {} attempts: {}",
        request.url,
        MAX_RETRIES + 1,
        last_failure
    ));
    None
}

//! Shared HTTP plumbing for the async and blocking transports.

use sentinel_core::error::FeedError;
use serde::de::DeserializeOwned;
use std::time::Duration;

fn map_error(e: reqwest::Error, timeout: Duration) -> FeedError {
    if e.is_timeout() {
        FeedError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }
    } else if e.is_decode() {
        FeedError::MalformedResponse(e.to_string())
    } else {
        FeedError::Connection(e.to_string())
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FeedError> {
    serde_json::from_str(body).map_err(|e| FeedError::MalformedResponse(e.to_string()))
}

/// Send a request and decode a JSON body, with a per-request timeout.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<T, FeedError> {
    let resp = request
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| map_error(e, timeout))?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(FeedError::Http { status, body });
    }

    let body = resp.text().await.map_err(|e| map_error(e, timeout))?;
    decode(&body)
}

/// Blocking counterpart of [`get_json`]. Must only run on a blocking worker.
pub(crate) fn get_json_blocking<T: DeserializeOwned>(
    url: &str,
    query: &[(&str, String)],
    timeout: Duration,
) -> Result<T, FeedError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| FeedError::Connection(e.to_string()))?;

    let resp = client
        .get(url)
        .query(query)
        .send()
        .map_err(|e| map_error(e, timeout))?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().unwrap_or_default();
        return Err(FeedError::Http { status, body });
    }

    let body = resp.text().map_err(|e| map_error(e, timeout))?;
    decode(&body)
}

/// Run a blocking transport call off the async workers.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, FeedError>
where
    F: FnOnce() -> Result<T, FeedError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| FeedError::Worker(e.to_string()))?
}

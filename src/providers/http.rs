//! HTTP JSON fetching with timeout, cancellation, and bounded retry.
//!
//! Failure classes matter here: network failures and timeouts are worth
//! retrying with backoff, while HTTP error responses, malformed bodies, and
//! explicit cancellation are surfaced immediately. Timeout is an internally
//! triggered abort and stays distinguishable from an external cancellation
//! so callers can swallow superseded requests without hiding real failures.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap};
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: usize = 2;
const RETRY_DELAYS_MS: [u64; MAX_RETRIES] = [500, 1000];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error")]
    Network,
    #[error("Request timeout")]
    Timeout,
    #[error("Request cancelled")]
    Cancelled,
    #[error("Invalid JSON")]
    InvalidJson,
    #[error("Invalid rates payload")]
    InvalidPayload,
    #[error("Request failed with status {status} - {detail}")]
    Http { status: u16, detail: String },
}

impl FetchError {
    /// Only transient transport-level failures are worth another attempt.
    pub fn is_retriable(&self) -> bool {
        matches!(self, FetchError::Network | FetchError::Timeout)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetJsonOptions {
    pub headers: Option<HeaderMap>,
    /// Per-attempt timeout; `None` means [`DEFAULT_TIMEOUT`].
    pub timeout: Option<Duration>,
    /// External cancellation; aborts immediately, never retried.
    pub cancel: Option<CancellationToken>,
}

/// GET a URL and parse the response body as a JSON object.
///
/// Retries up to 2 additional times (500 ms, then 1000 ms in between) for
/// retriable failures only.
pub async fn get_json(
    client: &reqwest::Client,
    url: &str,
    options: &GetJsonOptions,
) -> Result<Value, FetchError> {
    let mut attempt = 0;
    loop {
        match attempt_request(client, url, options).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retriable() && attempt < MAX_RETRIES => {
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt + 1,
                    MAX_RETRIES + 1,
                    err
                );
                tokio::time::sleep(Duration::from_millis(RETRY_DELAYS_MS[attempt])).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

async fn attempt_request(
    client: &reqwest::Client,
    url: &str,
    options: &GetJsonOptions,
) -> Result<Value, FetchError> {
    // A fresh token that is never cancelled stands in when the caller did
    // not supply one; its `cancelled()` future simply never resolves.
    let cancel = options.cancel.clone().unwrap_or_default();
    if cancel.is_cancelled() {
        return Err(FetchError::Cancelled);
    }

    let timeout = options.timeout.unwrap_or(DEFAULT_TIMEOUT);

    let request = async {
        let mut builder = client.get(url).header(ACCEPT, "application/json");
        if let Some(headers) = &options.headers {
            builder = builder.headers(headers.clone());
        }
        let response = builder.send().await.map_err(|e| {
            debug!("Request error for {url}: {e}");
            FetchError::Network
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|_| FetchError::Network)?;
        Ok::<_, FetchError>((status, body))
    };

    let (status, body) = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(FetchError::Cancelled),
        _ = tokio::time::sleep(timeout) => return Err(FetchError::Timeout),
        result = request => result?,
    };

    if !status.is_success() {
        return Err(http_error(status, &body));
    }

    if body.is_empty() {
        return Err(FetchError::InvalidJson);
    }
    let parsed: Value = serde_json::from_str(&body).map_err(|_| FetchError::InvalidJson)?;
    if !parsed.is_object() {
        return Err(FetchError::InvalidJson);
    }
    Ok(parsed)
}

/// Build the error for a non-2xx response, preferring a human-readable
/// `message`/`error` field from the body over the raw body or status text.
fn http_error(status: StatusCode, body: &str) -> FetchError {
    let mut detail = if body.is_empty() {
        status.canonical_reason().unwrap_or("Unknown error").to_string()
    } else {
        body.to_string()
    };

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        let message = map.get("message").or_else(|| map.get("error"));
        if let Some(Value::String(text)) = message
            && !text.trim().is_empty()
        {
            detail = text.clone();
        }
    }

    FetchError::Http {
        status: status.as_u16(),
        detail,
    }
}

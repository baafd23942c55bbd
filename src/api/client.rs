// src/api/client.rs
//! The request engine: one logical call against the Notion API.
//!
//! `execute` owns the three behaviors the rest of the system relies on:
//! minimum inter-request spacing per client instance, a bounded retry
//! budget for 429 responses, and translation of transport/HTTP failures
//! into the typed [`AppError`] vocabulary. Layers above this never see
//! raw HTTP detail.

use crate::api::transport::{HttpTransport, ReqwestTransport, WireRequest};
use crate::constants::{
    DEFAULT_RETRY_AFTER_SECS, MAX_RATE_LIMIT_ATTEMPTS, MIN_REQUEST_INTERVAL_MS,
    NOTION_API_BASE_URL,
};
use crate::error::{AppError, NotionErrorCode};
use crate::types::ApiKey;
use parking_lot::Mutex;
use reqwest::Method;
use serde_json::Value;
use std::thread;
use std::time::{Duration, Instant};

/// Query parameters as ordered key/value pairs.
pub type QueryParams = [(String, String)];

/// Rate-limited, retrying client for the Notion API.
///
/// One instance assumes one logical call stream. The last-request
/// timestamp is the only shared mutable state; the mutex serializes
/// callers that nonetheless share an instance across threads.
pub struct NotionClient {
    transport: Box<dyn HttpTransport>,
    min_request_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl NotionClient {
    /// Creates a client backed by the production HTTP transport.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        Ok(Self::with_transport(Box::new(ReqwestTransport::new(
            api_key,
        )?)))
    }

    /// Creates a client over an arbitrary transport. Tests use this to
    /// inject scripted responses.
    pub fn with_transport(transport: Box<dyn HttpTransport>) -> Self {
        Self {
            transport,
            min_request_interval: Duration::from_millis(MIN_REQUEST_INTERVAL_MS),
            last_request: Mutex::new(None),
        }
    }

    /// Overrides the inter-request spacing. Tests shrink it to zero.
    pub fn with_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    /// Issues one logical API call with rate limiting and 429 retry.
    ///
    /// Non-429 error responses fail immediately as `AppError::Api`;
    /// transport failures fail immediately as `AppError::Connection` and
    /// are never retried.
    pub fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        params: Option<&QueryParams>,
    ) -> Result<Value, AppError> {
        let url = compose_url(path, params)?;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            self.pace();
            log::debug!("{} {} (attempt {})", method, url, attempt);

            let reply = self.transport.send(&WireRequest {
                method: method.clone(),
                url: url.clone(),
                body,
            })?;

            if reply.status.is_success() {
                return serde_json::from_str(&reply.body).map_err(|e| {
                    AppError::MalformedResponse(format!("{} {}: {}", method, path, e))
                });
            }

            if reply.status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after = reply.retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                if attempt < MAX_RATE_LIMIT_ATTEMPTS {
                    log::warn!(
                        "Rate limited on {} {}; retrying in {}s",
                        method,
                        path,
                        retry_after
                    );
                    thread::sleep(Duration::from_secs_f64(retry_after.max(0.0)));
                    continue;
                }
                return Err(AppError::RateLimited {
                    attempts: MAX_RATE_LIMIT_ATTEMPTS,
                    retry_after,
                });
            }

            let (code, message) = parse_error_body(&reply.body, reply.status);
            return Err(AppError::Api {
                code,
                message,
                status: reply.status,
            });
        }
    }

    /// Enforces the minimum spacing since the last physical send.
    ///
    /// The lock is held across the sleep so concurrent callers sharing a
    /// client are serialized rather than racing the timestamp.
    fn pace(&self) {
        let mut last = self.last_request.lock();
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_request_interval {
                thread::sleep(self.min_request_interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}

/// Composes the request URL from the fixed base, path, and query params.
fn compose_url(path: &str, params: Option<&QueryParams>) -> Result<String, AppError> {
    let mut url = url::Url::parse(&format!("{}{}", NOTION_API_BASE_URL, path))
        .map_err(|e| AppError::validation("invalid_path", format!("Bad API path {}: {}", path, e)))?;

    if let Some(params) = params {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }

    Ok(url.into())
}

/// Pulls a typed code and message out of an error response body,
/// defaulting the code to the HTTP status when the body yields none.
fn parse_error_body(body: &str, status: reqwest::StatusCode) -> (NotionErrorCode, String) {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let code = parsed
        .as_ref()
        .and_then(|v| v.get("code"))
        .and_then(Value::as_str)
        .map(NotionErrorCode::from_api_response)
        .unwrap_or_else(|| NotionErrorCode::from_http_status(status.as_u16()));

    let message = parsed
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status));

    (code, message)
}

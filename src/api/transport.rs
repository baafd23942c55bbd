// src/api/transport.rs
//! The wire boundary: one physical HTTP exchange.
//!
//! Everything above this trait deals in [`WireRequest`]/[`WireResponse`]
//! values; tests inject scripted transports, production uses reqwest's
//! blocking client with the Notion auth headers installed once.

use crate::constants::NOTION_API_VERSION;
use crate::error::AppError;
use crate::types::ApiKey;
use reqwest::{header, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// A single outbound request, fully composed.
#[derive(Debug)]
pub struct WireRequest<'a> {
    pub method: Method,
    pub url: String,
    pub body: Option<&'a Value>,
}

/// A single inbound response, reduced to what the engine needs.
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: StatusCode,
    /// Parsed `Retry-After` header in seconds, when present.
    pub retry_after: Option<f64>,
    pub body: String,
}

/// The ability to perform one HTTP exchange.
///
/// A transport failure (DNS, refused connection, timeout before any
/// response) surfaces as `AppError::Connection`; an HTTP error status is
/// a successful exchange and comes back as a [`WireResponse`].
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: &WireRequest<'_>) -> Result<WireResponse, AppError>;
}

/// Production transport backed by reqwest's blocking client.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Builds a blocking client with Notion auth headers and sane timeouts.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        let client = reqwest::blocking::Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Connection(e.to_string()))?;
        Ok(Self { client })
    }

    /// Creates the default headers sent with every Notion API request.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &WireRequest<'_>) -> Result<WireResponse, AppError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url);
        if let Some(body) = request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| AppError::Connection(e.to_string()))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<f64>().ok());
        let body = response
            .text()
            .map_err(|e| AppError::Connection(e.to_string()))?;

        Ok(WireResponse {
            status,
            retry_after,
            body,
        })
    }
}

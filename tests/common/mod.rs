// tests/common/mod.rs
//! Shared scripted transport for exercising the client without a network.
#![allow(dead_code)]

use notionctl::{AppError, HttpTransport, NotionClient, WireRequest, WireResponse};
use parking_lot::Mutex;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// One request as observed at the wire boundary.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub url: String,
    pub body: Option<Value>,
}

/// Replays a fixed script of responses and records every request.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<WireResponse, AppError>>>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Result<WireResponse, AppError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().clone()
    }
}

impl HttpTransport for ScriptedTransport {
    fn send(&self, request: &WireRequest<'_>) -> Result<WireResponse, AppError> {
        self.seen.lock().push(SeenRequest {
            method: request.method.to_string(),
            url: request.url.clone(),
            body: request.body.cloned(),
        });
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request: {} {}", request.method, request.url))
    }
}

/// Orphan-rule-safe handle so a shared `ScriptedTransport` can be boxed.
pub struct SharedTransport(pub Arc<ScriptedTransport>);

impl HttpTransport for SharedTransport {
    fn send(&self, request: &WireRequest<'_>) -> Result<WireResponse, AppError> {
        self.0.send(request)
    }
}

/// Client over a scripted transport with the request spacing disabled.
pub fn scripted_client(transport: &Arc<ScriptedTransport>) -> NotionClient {
    NotionClient::with_transport(Box::new(SharedTransport(Arc::clone(transport))))
        .with_request_interval(Duration::ZERO)
}

pub fn ok(body: Value) -> Result<WireResponse, AppError> {
    Ok(WireResponse {
        status: StatusCode::OK,
        retry_after: None,
        body: body.to_string(),
    })
}

pub fn rate_limited(retry_after: Option<f64>) -> Result<WireResponse, AppError> {
    Ok(WireResponse {
        status: StatusCode::TOO_MANY_REQUESTS,
        retry_after,
        body: json!({ "code": "rate_limited", "message": "slow down" }).to_string(),
    })
}

pub fn api_error(status: u16, code: &str, message: &str) -> Result<WireResponse, AppError> {
    Ok(WireResponse {
        status: StatusCode::from_u16(status).expect("valid status"),
        retry_after: None,
        body: json!({ "code": code, "message": message }).to_string(),
    })
}

/// One page of a listing response.
pub fn page_of(results: Vec<Value>, next_cursor: Option<&str>) -> Result<WireResponse, AppError> {
    ok(json!({
        "object": "list",
        "results": results,
        "has_more": next_cursor.is_some(),
        "next_cursor": next_cursor,
    }))
}

/// A fetched paragraph block, optionally reporting descendants.
pub fn paragraph_block(id: &str, text: &str, has_children: bool) -> Value {
    json!({
        "object": "block",
        "id": id,
        "type": "paragraph",
        "has_children": has_children,
        "created_time": "2024-01-01T00:00:00.000Z",
        "last_edited_time": "2024-01-02T00:00:00.000Z",
        "paragraph": {
            "id": format!("{}-content", id),
            "created_time": "2024-01-01T00:00:00.000Z",
            "last_edited_time": "2024-01-02T00:00:00.000Z",
            "rich_text": [{ "plain_text": text }],
        },
    })
}

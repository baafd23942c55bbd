// src/api/pagination.rs
//! Cursor pagination over Notion's listing protocol.
//!
//! Listing endpoints accept `page_size`/`start_cursor` and answer with
//! `results`/`has_more`/`next_cursor`. `collect` drives the request
//! engine until exhaustion or a caller-supplied cap, preserving server
//! order. Write-style listings (POST/PATCH) take the cursor in the body;
//! read-style listings take it in the query string. The caller's
//! original body and params are never mutated.

use crate::api::client::{NotionClient, QueryParams};
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One page of a listing response, as the server shapes it.
#[derive(Debug, Clone, Deserialize)]
pub struct PageEnvelope {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// All items collected across pages, in server-returned order.
#[derive(Debug, Clone, Serialize)]
pub struct Collected {
    pub results: Vec<Value>,
    pub total: usize,
}

impl Collected {
    /// Serializes into the `{"results": [...], "total": n}` shape the
    /// CLI and callers consume.
    pub fn into_value(self) -> Value {
        json!({ "results": self.results, "total": self.total })
    }
}

impl NotionClient {
    /// Collects every result page from a listing endpoint.
    ///
    /// Stops when `max_results` is reached (truncating exactly to the
    /// cap) or when the server reports no further pages. No re-sorting
    /// or de-duplication is performed.
    pub fn collect(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        params: Option<&QueryParams>,
        max_results: Option<usize>,
    ) -> Result<Collected, AppError> {
        let mut all_results: Vec<Value> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let response = if method == Method::GET {
                let mut query: Vec<(String, String)> =
                    params.map(<[_]>::to_vec).unwrap_or_default();
                query.push(("page_size".to_string(), NOTION_API_PAGE_SIZE.to_string()));
                if let Some(cursor) = &cursor {
                    query.push(("start_cursor".to_string(), cursor.clone()));
                }
                self.execute(Method::GET, path, None, Some(&query))?
            } else {
                let mut page_body = body.cloned().unwrap_or_else(|| json!({}));
                page_body["page_size"] = json!(NOTION_API_PAGE_SIZE);
                if let Some(cursor) = &cursor {
                    page_body["start_cursor"] = json!(cursor);
                }
                self.execute(method.clone(), path, Some(&page_body), params)?
            };

            let envelope: PageEnvelope = serde_json::from_value(response)?;
            all_results.extend(envelope.results);

            if let Some(max) = max_results {
                if all_results.len() >= max {
                    all_results.truncate(max);
                    break;
                }
            }

            if !envelope.has_more {
                break;
            }
            match envelope.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(Collected {
            total: all_results.len(),
            results: all_results,
        })
    }
}

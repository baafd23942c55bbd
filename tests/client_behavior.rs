// tests/client_behavior.rs
//! Request engine and paginator behavior against a scripted transport:
//! retry budget, rate-limit spacing, error translation, and cursor
//! propagation.

mod common;

use common::*;
use notionctl::{AppError, NotionClient, NotionErrorCode};
use pretty_assertions::assert_eq;
use reqwest::Method;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

#[test]
fn success_returns_parsed_payload() {
    let transport = ScriptedTransport::new(vec![ok(json!({ "object": "user", "name": "bot" }))]);
    let client = scripted_client(&transport);

    let payload = client
        .execute(Method::GET, "/users/me", None, None)
        .unwrap();
    assert_eq!(payload["name"], "bot");

    let seen = transport.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].url, "https://api.notion.com/v1/users/me");
}

#[test]
fn rate_limit_retries_honor_retry_after_then_succeed() {
    let transport = ScriptedTransport::new(vec![
        rate_limited(Some(0.2)),
        rate_limited(Some(0.2)),
        ok(json!({ "object": "page", "id": "p1" })),
    ]);
    let client = scripted_client(&transport);

    let started = Instant::now();
    let payload = client
        .execute(Method::GET, "/pages/p1", None, None)
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(payload["id"], "p1");
    assert_eq!(transport.seen().len(), 3);
    // Two retry sleeps of 0.2s each
    assert!(elapsed >= Duration::from_millis(400), "elapsed {:?}", elapsed);
}

#[test]
fn sustained_rate_limiting_exhausts_the_budget() {
    let transport = ScriptedTransport::new(vec![
        rate_limited(Some(0.0)),
        rate_limited(Some(0.0)),
        rate_limited(Some(0.0)),
    ]);
    let client = scripted_client(&transport);

    let error = client
        .execute(Method::GET, "/pages/p1", None, None)
        .unwrap_err();
    match error {
        AppError::RateLimited {
            attempts,
            retry_after,
        } => {
            assert_eq!(attempts, 3);
            assert_eq!(retry_after, 0.0);
        }
        other => panic!("expected RateLimited, got {:?}", other),
    }
    assert_eq!(transport.seen().len(), 3);
}

#[test]
fn missing_retry_after_defaults_to_one_second() {
    let transport = ScriptedTransport::new(vec![
        rate_limited(None),
        rate_limited(None),
        rate_limited(None),
    ]);
    let client = scripted_client(&transport);

    let error = client
        .execute(Method::GET, "/pages/p1", None, None)
        .unwrap_err();
    match error {
        AppError::RateLimited { retry_after, .. } => assert_eq!(retry_after, 1.0),
        other => panic!("expected RateLimited, got {:?}", other),
    }
}

#[test]
fn non_rate_limit_errors_fail_without_retry() {
    let transport = ScriptedTransport::new(vec![api_error(
        404,
        "object_not_found",
        "Could not find page",
    )]);
    let client = scripted_client(&transport);

    let error = client
        .execute(Method::GET, "/pages/missing", None, None)
        .unwrap_err();
    match error {
        AppError::Api { code, message, .. } => {
            assert_eq!(code, NotionErrorCode::ObjectNotFound);
            assert_eq!(message, "Could not find page");
        }
        other => panic!("expected Api, got {:?}", other),
    }
    assert_eq!(transport.seen().len(), 1);
}

#[test]
fn transport_failure_is_never_retried() {
    let transport = ScriptedTransport::new(vec![Err(AppError::Connection(
        "dns error: no such host".to_string(),
    ))]);
    let client = scripted_client(&transport);

    let error = client
        .execute(Method::GET, "/users", None, None)
        .unwrap_err();
    assert!(matches!(error, AppError::Connection(_)));
    assert_eq!(transport.seen().len(), 1);
}

#[test]
fn requests_are_spaced_by_the_minimum_interval() {
    let transport = ScriptedTransport::new(vec![ok(json!({})), ok(json!({}))]);
    let client = NotionClient::with_transport(Box::new(SharedTransport(std::sync::Arc::clone(
        &transport,
    ))))
        .with_request_interval(Duration::from_millis(80));

    let started = Instant::now();
    client.execute(Method::GET, "/users/me", None, None).unwrap();
    client.execute(Method::GET, "/users/me", None, None).unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(80), "elapsed {:?}", elapsed);
}

fn numbered(from: usize, count: usize) -> Vec<Value> {
    (from..from + count).map(|i| json!({ "n": i })).collect()
}

#[test]
fn collect_aggregates_all_pages_in_order() {
    let transport = ScriptedTransport::new(vec![
        page_of(numbered(0, 100), Some("c1")),
        page_of(numbered(100, 100), Some("c2")),
        page_of(numbered(200, 40), None),
    ]);
    let client = scripted_client(&transport);

    let collected = client
        .collect(Method::GET, "/blocks/b1/children", None, None, None)
        .unwrap();

    assert_eq!(collected.total, 240);
    let order: Vec<u64> = collected
        .results
        .iter()
        .map(|v| v["n"].as_u64().unwrap())
        .collect();
    assert_eq!(order, (0..240).collect::<Vec<u64>>());

    let seen = transport.seen();
    assert_eq!(seen.len(), 3);
    assert!(seen[0].url.contains("page_size=100"));
    assert!(!seen[0].url.contains("start_cursor"));
    assert!(seen[1].url.contains("start_cursor=c1"));
    assert!(seen[2].url.contains("start_cursor=c2"));
}

#[test]
fn collect_truncates_exactly_at_max_results() {
    let transport = ScriptedTransport::new(vec![
        page_of(numbered(0, 100), Some("c1")),
        page_of(numbered(100, 100), Some("c2")),
    ]);
    let client = scripted_client(&transport);

    let collected = client
        .collect(Method::GET, "/users", None, None, Some(150))
        .unwrap();

    assert_eq!(collected.total, 150);
    assert_eq!(collected.results.len(), 150);
    assert_eq!(collected.results[149]["n"], 149);
    // The cap was hit mid-stream; no third page is requested
    assert_eq!(transport.seen().len(), 2);
}

#[test]
fn write_style_listing_injects_cursor_into_body_copy() {
    let transport = ScriptedTransport::new(vec![
        page_of(numbered(0, 100), Some("c1")),
        page_of(numbered(100, 10), None),
    ]);
    let client = scripted_client(&transport);

    let body = json!({ "filter": { "property": "Status", "select": { "equals": "Done" } } });
    let collected = client
        .collect(
            Method::POST,
            "/databases/d1/query",
            Some(&body),
            None,
            None,
        )
        .unwrap();
    assert_eq!(collected.total, 110);

    let seen = transport.seen();
    let first = seen[0].body.as_ref().unwrap();
    assert_eq!(first["page_size"], 100);
    assert_eq!(first["filter"]["property"], "Status");
    assert!(first.get("start_cursor").is_none());

    let second = seen[1].body.as_ref().unwrap();
    assert_eq!(second["start_cursor"], "c1");
    assert_eq!(second["filter"]["property"], "Status");

    // The caller's body is copied, never mutated
    assert!(body.get("page_size").is_none());
    assert!(body.get("start_cursor").is_none());
}

#[test]
fn read_style_listing_keeps_caller_params_each_page() {
    let transport = ScriptedTransport::new(vec![
        page_of(numbered(0, 100), Some("c1")),
        page_of(numbered(100, 1), None),
    ]);
    let client = scripted_client(&transport);

    let params = vec![("block_id".to_string(), "b42".to_string())];
    client
        .collect(Method::GET, "/comments", None, Some(&params), None)
        .unwrap();

    let seen = transport.seen();
    assert!(seen[0].url.contains("block_id=b42"));
    assert!(seen[1].url.contains("block_id=b42"));
    assert!(seen[1].url.contains("start_cursor=c1"));
    assert_eq!(params.len(), 1);
}

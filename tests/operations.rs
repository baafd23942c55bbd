// tests/operations.rs
//! Per-endpoint operations: type resolution fallback, body assembly,
//! and fan-out behavior.

mod common;

use common::*;
use notionctl::config::{
    BlockAction, BlocksArgs, FetchArgs, MovePageArgs, ObjectKind, ParentKind, QueryDatabaseArgs,
    UpdatePageArgs,
};
use notionctl::{ops, AppError};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn fetch_falls_through_page_then_database_then_block() {
    let transport = ScriptedTransport::new(vec![
        api_error(404, "object_not_found", "not a page"),
        api_error(404, "object_not_found", "not a database"),
        ok(json!({ "object": "block", "id": "b1", "has_children": false })),
    ]);
    let client = scripted_client(&transport);

    let args = FetchArgs {
        id: "550e8400e29b41d4a716446655440000".to_string(),
        object_type: None,
        include_children: false,
    };
    let fetched = ops::fetch(&client, &args).unwrap();
    assert_eq!(fetched["object"], "block");

    let urls: Vec<String> = transport.seen().into_iter().map(|r| r.url).collect();
    assert!(urls[0].contains("/pages/550e8400-e29b-41d4-a716-446655440000"));
    assert!(urls[1].contains("/databases/550e8400-e29b-41d4-a716-446655440000"));
    assert!(urls[2].contains("/blocks/550e8400-e29b-41d4-a716-446655440000"));
}

#[test]
fn fetch_with_explicit_type_propagates_the_error() {
    let transport = ScriptedTransport::new(vec![api_error(
        404,
        "object_not_found",
        "no such page",
    )]);
    let client = scripted_client(&transport);

    let args = FetchArgs {
        id: "550e8400e29b41d4a716446655440000".to_string(),
        object_type: Some(ObjectKind::Page),
        include_children: false,
    };
    let error = ops::fetch(&client, &args).unwrap_err();
    assert!(matches!(error, AppError::Api { .. }));
    assert_eq!(transport.seen().len(), 1);
}

#[test]
fn fetch_fallback_stops_on_non_api_errors() {
    // A rate-limit exhaustion must not be downgraded into "try the next
    // endpoint".
    let transport = ScriptedTransport::new(vec![
        rate_limited(Some(0.0)),
        rate_limited(Some(0.0)),
        rate_limited(Some(0.0)),
    ]);
    let client = scripted_client(&transport);

    let args = FetchArgs {
        id: "550e8400e29b41d4a716446655440000".to_string(),
        object_type: None,
        include_children: false,
    };
    let error = ops::fetch(&client, &args).unwrap_err();
    assert!(matches!(error, AppError::RateLimited { .. }));
    assert_eq!(transport.seen().len(), 3);
}

#[test]
fn move_page_issues_one_patch_per_id() {
    let transport = ScriptedTransport::new(vec![
        ok(json!({ "object": "page", "id": "a" })),
        ok(json!({ "object": "page", "id": "b" })),
    ]);
    let client = scripted_client(&transport);

    let args = MovePageArgs {
        page_ids: "550e8400e29b41d4a716446655440000, 11111111222233334444555566667777"
            .to_string(),
        new_parent_id: "aaaaaaaabbbbccccddddeeeeeeeeeeee".to_string(),
        new_parent_type: ParentKind::PageId,
    };
    let moved = ops::move_page(&client, &args).unwrap();
    assert_eq!(moved["total"], 2);

    let seen = transport.seen();
    assert_eq!(seen.len(), 2);
    for request in &seen {
        assert_eq!(request.method, "PATCH");
        assert_eq!(
            request.body.as_ref().unwrap()["parent"]["page_id"],
            "aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee"
        );
    }
}

#[test]
fn move_single_page_returns_the_bare_response() {
    let transport = ScriptedTransport::new(vec![ok(json!({ "object": "page", "id": "a" }))]);
    let client = scripted_client(&transport);

    let args = MovePageArgs {
        page_ids: "550e8400e29b41d4a716446655440000".to_string(),
        new_parent_id: "aaaaaaaabbbbccccddddeeeeeeeeeeee".to_string(),
        new_parent_type: ParentKind::DatabaseId,
    };
    let moved = ops::move_page(&client, &args).unwrap();
    assert_eq!(moved["object"], "page");
    assert_eq!(
        transport.seen()[0].body.as_ref().unwrap()["parent"]["database_id"],
        "aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee"
    );
}

#[test]
fn update_page_without_flags_is_a_validation_error() {
    let transport = ScriptedTransport::new(vec![]);
    let client = scripted_client(&transport);

    let args = UpdatePageArgs {
        page_id: "550e8400e29b41d4a716446655440000".to_string(),
        ..Default::default()
    };
    let error = ops::update_page(&client, &args).unwrap_err();
    assert!(matches!(error, AppError::Validation { .. }));
    assert!(transport.seen().is_empty());
}

#[test]
fn update_page_appends_text_as_a_paragraph() {
    let transport = ScriptedTransport::new(vec![ok(json!({ "object": "list", "results": [] }))]);
    let client = scripted_client(&transport);

    let args = UpdatePageArgs {
        page_id: "550e8400e29b41d4a716446655440000".to_string(),
        append_text: Some("meeting notes".to_string()),
        ..Default::default()
    };
    ops::update_page(&client, &args).unwrap();

    let body = transport.seen()[0].body.clone().unwrap();
    let children = body["children"].as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["type"], "paragraph");
    assert_eq!(
        children[0]["paragraph"]["rich_text"][0]["text"]["content"],
        "meeting notes"
    );
}

#[test]
fn query_database_manual_pagination_passes_cursor_through() {
    let transport = ScriptedTransport::new(vec![ok(json!({
        "object": "list",
        "results": [],
        "has_more": false,
        "next_cursor": null,
    }))]);
    let client = scripted_client(&transport);

    let args = QueryDatabaseArgs {
        database_id: "550e8400e29b41d4a716446655440000".to_string(),
        page_size: Some(500),
        cursor: Some("abc".to_string()),
        no_auto_paginate: true,
        ..Default::default()
    };
    ops::query_database(&client, &args).unwrap();

    let body = transport.seen()[0].body.clone().unwrap();
    // Requested page size is clamped to the API maximum
    assert_eq!(body["page_size"], 100);
    assert_eq!(body["start_cursor"], "abc");
}

#[test]
fn blocks_actions_validate_required_arguments() {
    let transport = ScriptedTransport::new(vec![]);
    let client = scripted_client(&transport);

    let missing_id = BlocksArgs {
        action: BlockAction::Get,
        block_id: None,
        blocks_json: None,
        block_json: None,
        text: None,
        max_results: None,
    };
    assert!(matches!(
        ops::blocks(&client, &missing_id).unwrap_err(),
        AppError::Validation { .. }
    ));

    let missing_content = BlocksArgs {
        action: BlockAction::Append,
        block_id: Some("550e8400e29b41d4a716446655440000".to_string()),
        blocks_json: None,
        block_json: None,
        text: None,
        max_results: None,
    };
    assert!(matches!(
        ops::blocks(&client, &missing_content).unwrap_err(),
        AppError::Validation { .. }
    ));
    assert!(transport.seen().is_empty());
}

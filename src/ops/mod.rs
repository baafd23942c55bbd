// src/ops/mod.rs
//! Per-endpoint operations — the business surface shared by the CLI.
//!
//! Every function takes a client reference and returns plain JSON data
//! or a typed error. None of these catch and downgrade engine errors;
//! a rate-limit or connection failure propagates unchanged to the
//! caller.

pub mod tree;

use crate::api::NotionClient;
use crate::builders::{make_paragraph, parse_json_arg, simple_rich_text};
use crate::config::{
    BlockAction, BlocksArgs, CreateCommentArgs, CreateDatabaseArgs, CreatePageArgs, DateRelative,
    FetchArgs, GetUsersArgs, MovePageArgs, ObjectKind, ParentKind, QueryDatabaseArgs,
    QueryMeetingNotesArgs, SearchArgs, SortDirection, UpdateDatabaseArgs, UpdatePageArgs,
};
use crate::constants::{MAX_FETCH_DEPTH, NOTION_API_PAGE_SIZE};
use crate::error::AppError;
use crate::types::NotionId;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::{json, Map, Value};

pub use tree::{append_children_chunked, duplicate_page, fetch_children_recursive,
    prepare_blocks_for_copy};

const SECONDS_PER_DAY: i64 = 86_400;

/// Verifies the API token by retrieving the bot user.
pub fn setup(client: &NotionClient) -> Result<Value, AppError> {
    let bot = client.execute(Method::GET, "/users/me", None, None)?;
    Ok(json!({
        "success": true,
        "message": "Token is valid.",
        "bot": bot,
    }))
}

/// Retrieves a page, database, or block by ID or URL.
///
/// With no explicit type the endpoints are tried in order — page, then
/// database, then block — falling through only on API rejections.
/// Rate-limit exhaustion and transport failures propagate immediately.
pub fn fetch(client: &NotionClient, args: &FetchArgs) -> Result<Value, AppError> {
    let id = NotionId::from_input(&args.id);

    match args.object_type {
        Some(ObjectKind::Page) => fetch_page(client, &id, args.include_children),
        Some(ObjectKind::Database) => fetch_database(client, &id),
        Some(ObjectKind::Block) => fetch_block(client, &id, args.include_children),
        None => match fetch_page(client, &id, args.include_children) {
            Ok(page) => Ok(page),
            Err(AppError::Api { .. }) => match fetch_database(client, &id) {
                Ok(database) => Ok(database),
                Err(AppError::Api { .. }) => fetch_block(client, &id, args.include_children),
                Err(other) => Err(other),
            },
            Err(other) => Err(other),
        },
    }
}

fn fetch_page(
    client: &NotionClient,
    id: &NotionId,
    include_children: bool,
) -> Result<Value, AppError> {
    let mut page = client.execute(Method::GET, &format!("/pages/{}", id), None, None)?;
    if include_children {
        let children = fetch_children_recursive(client, id.as_str(), MAX_FETCH_DEPTH, 0)?;
        page["children"] = Value::Array(children);
    }
    Ok(page)
}

fn fetch_database(client: &NotionClient, id: &NotionId) -> Result<Value, AppError> {
    client.execute(Method::GET, &format!("/databases/{}", id), None, None)
}

fn fetch_block(
    client: &NotionClient,
    id: &NotionId,
    include_children: bool,
) -> Result<Value, AppError> {
    let mut block = client.execute(Method::GET, &format!("/blocks/{}", id), None, None)?;
    let has_children = block
        .get("has_children")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if include_children && has_children {
        let children = fetch_children_recursive(client, id.as_str(), MAX_FETCH_DEPTH, 0)?;
        block["children"] = Value::Array(children);
    }
    Ok(block)
}

/// Searches the workspace, auto-paginating up to `max_results`.
pub fn search(client: &NotionClient, args: &SearchArgs) -> Result<Value, AppError> {
    let body = build_search_body(args);
    let collected = client.collect(Method::POST, "/search", Some(&body), None, args.max_results)?;
    Ok(collected.into_value())
}

/// Assembles the search request body from the caller's arguments.
pub fn build_search_body(args: &SearchArgs) -> Value {
    let mut body = json!({ "query": args.query });

    if let Some(filter) = args.filter {
        body["filter"] = json!({ "value": filter.as_tag(), "property": "object" });
    }

    if let Some(sort) = args.sort {
        let direction = match sort {
            SortDirection::Asc => "ascending",
            SortDirection::Desc => "descending",
        };
        body["sort"] = json!({ "direction": direction, "timestamp": "last_edited_time" });
    }

    body
}

/// Creates a new page under a page or database parent.
pub fn create_page(client: &NotionClient, args: &CreatePageArgs) -> Result<Value, AppError> {
    let parent_id = NotionId::from_input(&args.parent_id);
    let mut body = json!({ "parent": { (args.parent_type.as_tag()): parent_id } });

    body["properties"] = match &args.properties_json {
        Some(raw) => {
            let properties = parse_json_arg(raw, "properties_json")?;
            if !properties.is_object() {
                return Err(AppError::validation(
                    "invalid_json",
                    "properties_json must be a JSON object",
                ));
            }
            properties
        }
        None => json!({}),
    };

    if let Some(title) = &args.title {
        let title_key = match args.parent_type {
            ParentKind::DatabaseId => args.title_property.as_str(),
            ParentKind::PageId => "title",
        };
        body["properties"][title_key] = json!({ "title": simple_rich_text(title) });
    }

    let children = match (&args.content_json, &args.content_text) {
        (Some(raw), _) => json_block_array(raw, "content_json")?,
        (None, Some(text)) => vec![make_paragraph(text)],
        (None, None) => Vec::new(),
    };
    if !children.is_empty() {
        body["children"] = Value::Array(children);
    }

    if let Some(emoji) = &args.icon_emoji {
        body["icon"] = json!({ "type": "emoji", "emoji": emoji });
    }
    if let Some(url) = &args.cover_url {
        body["cover"] = json!({ "type": "external", "external": { "url": url } });
    }

    client.execute(Method::POST, "/pages", Some(&body), None)
}

/// Updates a page's properties, metadata, and/or appended content.
pub fn update_page(client: &NotionClient, args: &UpdatePageArgs) -> Result<Value, AppError> {
    let pid = NotionId::from_input(&args.page_id);
    let mut response: Option<Value> = None;

    let has_metadata_update = args.properties_json.is_some()
        || args.title.is_some()
        || args.archive
        || args.unarchive
        || args.icon_emoji.is_some()
        || args.cover_url.is_some();

    if has_metadata_update {
        let mut body = Map::new();

        if let Some(raw) = &args.properties_json {
            body.insert("properties".to_string(), parse_json_arg(raw, "properties_json")?);
        } else if let Some(title) = &args.title {
            let page = client.execute(Method::GET, &format!("/pages/{}", pid), None, None)?;
            let title_prop = find_title_property(&page).unwrap_or_else(|| "title".to_string());
            body.insert(
                "properties".to_string(),
                json!({ title_prop: { "title": simple_rich_text(title) } }),
            );
        }

        if args.archive {
            body.insert("archived".to_string(), json!(true));
        }
        if args.unarchive {
            body.insert("archived".to_string(), json!(false));
        }
        if let Some(emoji) = &args.icon_emoji {
            body.insert("icon".to_string(), json!({ "type": "emoji", "emoji": emoji }));
        }
        if let Some(url) = &args.cover_url {
            body.insert(
                "cover".to_string(),
                json!({ "type": "external", "external": { "url": url } }),
            );
        }

        response = Some(client.execute(
            Method::PATCH,
            &format!("/pages/{}", pid),
            Some(&Value::Object(body)),
            None,
        )?);

        if args.append_blocks_json.is_none() && args.append_text.is_none() {
            return Ok(response.expect("metadata update just ran"));
        }
    }

    if args.append_blocks_json.is_some() || args.append_text.is_some() {
        let children = match (&args.append_blocks_json, &args.append_text) {
            (Some(raw), _) => json_block_array(raw, "append_blocks_json")?,
            (None, Some(text)) => vec![make_paragraph(text)],
            (None, None) => unreachable!("guarded by the enclosing if"),
        };
        return append_children_chunked(client, pid.as_str(), &children);
    }

    response.ok_or_else(|| AppError::validation("missing_args", "No update flags provided."))
}

/// Finds the name of a page's title property.
fn find_title_property(page: &Value) -> Option<String> {
    let properties = page.get("properties")?.as_object()?;
    properties.iter().find_map(|(name, value)| {
        (value.get("type")?.as_str()? == "title").then(|| name.clone())
    })
}

/// Creates a new database under a page parent.
pub fn create_database(client: &NotionClient, args: &CreateDatabaseArgs) -> Result<Value, AppError> {
    let parent_id = NotionId::from_input(&args.parent_id);
    let properties = parse_json_arg(&args.properties_json, "properties_json")?;

    let mut body = json!({
        "parent": { "page_id": parent_id },
        "title": simple_rich_text(&args.title),
        "properties": properties,
    });

    // A database schema must carry exactly one title property.
    let has_title_property = body["properties"]
        .as_object()
        .map(|props| props.values().any(|v| v.get("title").is_some()))
        .unwrap_or(false);
    if !has_title_property {
        body["properties"]["Name"] = json!({ "title": {} });
    }

    if let Some(description) = &args.description {
        body["description"] = simple_rich_text(description);
    }
    if args.inline {
        body["is_inline"] = json!(true);
    }
    if let Some(emoji) = &args.icon_emoji {
        body["icon"] = json!({ "type": "emoji", "emoji": emoji });
    }

    client.execute(Method::POST, "/databases", Some(&body), None)
}

/// Updates a database's schema or metadata.
pub fn update_database(client: &NotionClient, args: &UpdateDatabaseArgs) -> Result<Value, AppError> {
    let db_id = NotionId::from_input(&args.database_id);
    let mut body = Map::new();

    if let Some(title) = &args.title {
        body.insert("title".to_string(), simple_rich_text(title));
    }
    if let Some(description) = &args.description {
        body.insert("description".to_string(), simple_rich_text(description));
    }

    let mut properties = match &args.properties_json {
        Some(raw) => parse_json_arg(raw, "properties_json")?
            .as_object()
            .cloned()
            .ok_or_else(|| {
                AppError::validation("invalid_json", "properties_json must be a JSON object")
            })?,
        None => Map::new(),
    };
    if let Some(removals) = &args.remove_properties {
        // Setting a schema property to null removes it.
        for name in removals.split(',') {
            properties.insert(name.trim().to_string(), Value::Null);
        }
    }
    if !properties.is_empty() {
        body.insert("properties".to_string(), Value::Object(properties));
    }

    if args.archive {
        body.insert("archived".to_string(), json!(true));
    }

    if body.is_empty() {
        return Err(AppError::validation("missing_args", "No update flags provided."));
    }

    client.execute(
        Method::PATCH,
        &format!("/databases/{}", db_id),
        Some(&Value::Object(body)),
        None,
    )
}

/// Queries a database with filters and sorts.
pub fn query_database(client: &NotionClient, args: &QueryDatabaseArgs) -> Result<Value, AppError> {
    let db_id = NotionId::from_input(&args.database_id);
    let path = format!("/databases/{}/query", db_id);
    let mut body = Map::new();

    if let Some(raw) = &args.filter_json {
        body.insert("filter".to_string(), parse_json_arg(raw, "filter_json")?);
    }
    if let Some(raw) = &args.sorts_json {
        body.insert("sorts".to_string(), parse_json_arg(raw, "sorts_json")?);
    }

    if args.no_auto_paginate {
        if let Some(page_size) = args.page_size {
            body.insert(
                "page_size".to_string(),
                json!(page_size.min(NOTION_API_PAGE_SIZE)),
            );
        }
        if let Some(cursor) = &args.cursor {
            body.insert("start_cursor".to_string(), json!(cursor));
        }
        return client.execute(Method::POST, &path, Some(&Value::Object(body)), None);
    }

    let collected = client.collect(
        Method::POST,
        &path,
        Some(&Value::Object(body)),
        None,
        args.max_results,
    )?;
    Ok(collected.into_value())
}

/// Queries meeting notes: a workspace search narrowed by creation date.
pub fn query_meeting_notes(
    client: &NotionClient,
    args: &QueryMeetingNotesArgs,
) -> Result<Value, AppError> {
    let query = args.title_contains.as_deref().unwrap_or("meeting");
    let body = json!({ "query": query });

    let collected = client.collect(
        Method::POST,
        "/search",
        Some(&body),
        None,
        Some(args.max_results),
    )?;

    let now = Utc::now();
    let filtered: Vec<Value> = collected
        .results
        .into_iter()
        .filter(|page| page_matches_date_window(page, args, now))
        .collect();

    Ok(json!({ "total": filtered.len(), "results": filtered }))
}

/// Applies the absolute and relative creation-date filters to one
/// search result.
pub fn page_matches_date_window(
    page: &Value,
    args: &QueryMeetingNotesArgs,
    now: DateTime<Utc>,
) -> bool {
    if page.get("object").and_then(Value::as_str) != Some("page") {
        return false;
    }

    let created = page
        .get("created_time")
        .and_then(Value::as_str)
        .unwrap_or("");
    if let Some(from) = &args.date_from {
        if created < from.as_str() {
            return false;
        }
    }
    if let Some(to) = &args.date_to {
        if created > to.as_str() {
            return false;
        }
    }

    if let Some(relative) = args.date_relative {
        if let Ok(created_at) = DateTime::parse_from_rfc3339(created) {
            let age_seconds = (now - created_at.with_timezone(&Utc)).num_seconds();
            // `this_week` shares `past_week`'s trailing 7-day window;
            // kept as-is pending a product decision on calendar weeks.
            let window_days = match relative {
                DateRelative::PastWeek | DateRelative::ThisWeek => 7,
                DateRelative::PastMonth => 30,
            };
            if age_seconds > window_days * SECONDS_PER_DAY {
                return false;
            }
        }
    }

    true
}

/// Adds a comment to a page or discussion thread.
pub fn create_comment(client: &NotionClient, args: &CreateCommentArgs) -> Result<Value, AppError> {
    let mut body = Map::new();

    if let Some(parent_id) = &args.parent_id {
        body.insert(
            "parent".to_string(),
            json!({ "page_id": NotionId::from_input(parent_id) }),
        );
    }
    if let Some(discussion_id) = &args.discussion_id {
        body.insert("discussion_id".to_string(), json!(discussion_id));
    }

    let rich_text = match (&args.rich_text_json, &args.text) {
        (Some(raw), _) => parse_json_arg(raw, "rich_text_json")?,
        (None, Some(text)) => simple_rich_text(text),
        (None, None) => {
            return Err(AppError::validation(
                "missing_args",
                "Provide text or rich_text_json.",
            ))
        }
    };
    body.insert("rich_text".to_string(), rich_text);

    client.execute(Method::POST, "/comments", Some(&Value::Object(body)), None)
}

/// Collects all comments on a page or block.
pub fn get_comments(
    client: &NotionClient,
    page_id: &str,
    max_results: Option<usize>,
) -> Result<Value, AppError> {
    let block_id = NotionId::from_input(page_id);
    let params = vec![("block_id".to_string(), block_id.as_str().to_string())];
    let collected = client.collect(Method::GET, "/comments", None, Some(&params), max_results)?;
    Ok(collected.into_value())
}

/// Looks up a single user or lists workspace users with a local filter.
pub fn get_users(client: &NotionClient, args: &GetUsersArgs) -> Result<Value, AppError> {
    if let Some(user_id) = &args.user_id {
        let uid = if user_id == "me" {
            "me".to_string()
        } else {
            NotionId::from_input(user_id).as_str().to_string()
        };
        return client.execute(Method::GET, &format!("/users/{}", uid), None, None);
    }

    let collected = client.collect(Method::GET, "/users", None, None, args.max_results)?;
    let users = match &args.query {
        Some(query) => filter_users(collected.results, query),
        None => collected.results,
    };

    Ok(json!({ "total": users.len(), "results": users }))
}

/// Case-insensitive name/email filter over user records.
fn filter_users(users: Vec<Value>, query: &str) -> Vec<Value> {
    let needle = query.to_lowercase();
    users
        .into_iter()
        .filter(|user| {
            let name_matches = user
                .get("name")
                .and_then(Value::as_str)
                .map(|name| name.to_lowercase().contains(&needle))
                .unwrap_or(false);
            let email_matches = user.get("type").and_then(Value::as_str) == Some("person")
                && user
                    .get("person")
                    .and_then(|p| p.get("email"))
                    .and_then(Value::as_str)
                    .map(|email| email.to_lowercase().contains(&needle))
                    .unwrap_or(false);
            name_matches || email_matches
        })
        .collect()
}

/// Lists teamspaces. The public API has no teams endpoint, so workspace
/// users are returned as a proxy with an explicit warning.
pub fn get_teams(client: &NotionClient, query: Option<&str>) -> Result<Value, AppError> {
    let collected = client.collect(Method::GET, "/users", None, None, None)?;
    let users = match query {
        Some(query) => {
            let needle = query.to_lowercase();
            collected
                .results
                .into_iter()
                .filter(|user| {
                    user.get("name")
                        .and_then(Value::as_str)
                        .map(|name| name.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                })
                .collect()
        }
        None => collected.results,
    };

    Ok(json!({
        "warning": "The public Notion API does not have a dedicated teams \
                    endpoint. Returning workspace users as a proxy.",
        "total": users.len(),
        "users": users,
    }))
}

/// Moves one or more pages to a new parent.
pub fn move_page(client: &NotionClient, args: &MovePageArgs) -> Result<Value, AppError> {
    let parent_id = NotionId::from_input(&args.new_parent_id);
    let body = json!({ "parent": { (args.new_parent_type.as_tag()): parent_id } });

    let mut results = Vec::new();
    for raw_id in args.page_ids.split(',') {
        let pid = NotionId::from_input(raw_id.trim());
        let response = client.execute(
            Method::PATCH,
            &format!("/pages/{}", pid),
            Some(&body),
            None,
        )?;
        results.push(response);
    }

    if results.len() == 1 {
        return Ok(results.into_iter().next().expect("one result"));
    }
    Ok(json!({ "total": results.len(), "results": results }))
}

/// Block-level operations: get, children, append, update, delete.
pub fn blocks(client: &NotionClient, args: &BlocksArgs) -> Result<Value, AppError> {
    let block_id = args
        .block_id
        .as_deref()
        .map(NotionId::from_input);
    let require_id = |action: &str| {
        block_id.clone().ok_or_else(|| {
            AppError::validation("missing_args", format!("Block ID required for {}.", action))
        })
    };

    match args.action {
        BlockAction::Get => {
            let bid = require_id("get")?;
            client.execute(Method::GET, &format!("/blocks/{}", bid), None, None)
        }
        BlockAction::Children => {
            let bid = require_id("children")?;
            let collected = client.collect(
                Method::GET,
                &format!("/blocks/{}/children", bid),
                None,
                None,
                args.max_results,
            )?;
            Ok(collected.into_value())
        }
        BlockAction::Append => {
            let bid = require_id("append")?;
            let children = match (&args.blocks_json, &args.text) {
                (Some(raw), _) => json_block_array(raw, "blocks_json")?,
                (None, Some(text)) => vec![make_paragraph(text)],
                (None, None) => {
                    return Err(AppError::validation(
                        "missing_args",
                        "Provide blocks_json or text.",
                    ))
                }
            };
            append_children_chunked(client, bid.as_str(), &children)
        }
        BlockAction::Update => {
            let bid = require_id("update")?;
            let raw = args.block_json.as_deref().ok_or_else(|| {
                AppError::validation("missing_args", "Provide block_json.")
            })?;
            let block_data = parse_json_arg(raw, "block_json")?;
            client.execute(
                Method::PATCH,
                &format!("/blocks/{}", bid),
                Some(&block_data),
                None,
            )
        }
        BlockAction::Delete => {
            let bid = require_id("delete")?;
            client.execute(Method::DELETE, &format!("/blocks/{}", bid), None, None)
        }
    }
}

/// Parses a JSON argument that must be an array of blocks.
fn json_block_array(raw: &str, flag_name: &str) -> Result<Vec<Value>, AppError> {
    parse_json_arg(raw, flag_name)?
        .as_array()
        .cloned()
        .ok_or_else(|| {
            AppError::validation(
                "invalid_json",
                format!("{} must be a JSON array of blocks", flag_name),
            )
        })
}

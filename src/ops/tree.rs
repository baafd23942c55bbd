// src/ops/tree.rs
//! Recursive tree operations: deep child fetch, copy preparation, and
//! batched writes.
//!
//! Both "fetch with children" and page duplication share one recursive
//! shape: paginate a node's immediate children, descend into any child
//! that reports further descendants, and (for copies) rebuild the tree
//! without server-assigned identifiers. Writes are chunked to the API's
//! 100-children-per-call limit.

use crate::api::NotionClient;
use crate::builders::{extract_plain_text, simple_rich_text};
use crate::constants::{MAX_CHILDREN_PER_WRITE, MAX_FETCH_DEPTH};
use crate::error::AppError;
use crate::model::{BlockType, CopyablePropertyKind};
use crate::types::NotionId;
use reqwest::Method;
use serde_json::{json, Map, Value};

/// Recursively fetches a block's full descendant tree.
///
/// Children are attached under `"children"` on each expanded block.
/// Reaching `max_depth` yields an empty child set at that depth; depth
/// limiting is a safety bound, not a failure.
pub fn fetch_children_recursive(
    client: &NotionClient,
    block_id: &str,
    max_depth: u8,
    depth: u8,
) -> Result<Vec<Value>, AppError> {
    if depth >= max_depth {
        return Ok(Vec::new());
    }

    let collected = client.collect(
        Method::GET,
        &format!("/blocks/{}/children", block_id),
        None,
        None,
        None,
    )?;
    let mut blocks = collected.results;

    for block in &mut blocks {
        let has_children = block
            .get("has_children")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !has_children {
            continue;
        }
        let Some(child_id) = block.get("id").and_then(Value::as_str).map(str::to_string) else {
            continue;
        };
        let children = fetch_children_recursive(client, &child_id, max_depth, depth + 1)?;
        block["children"] = Value::Array(children);
    }

    Ok(blocks)
}

/// Rebuilds fetched blocks into a writable, ID-stripped form.
///
/// Server-assigned `id`, `created_time`, and `last_edited_time` are
/// removed from the type-specific content at every depth; all other
/// content fields are kept verbatim. Expanded children are stripped
/// recursively and reattached under the content key, which is where the
/// create endpoints expect nested blocks. Blocks whose type tag is not
/// in the [`BlockType`] vocabulary cannot be re-created and are skipped.
pub fn prepare_blocks_for_copy(blocks: &[Value]) -> Vec<Value> {
    let mut prepared = Vec::new();

    for block in blocks {
        let Some(block_type) = block
            .get("type")
            .and_then(Value::as_str)
            .and_then(BlockType::from_tag)
        else {
            continue;
        };
        let tag = block_type.as_tag();

        let mut new_block = Map::new();
        new_block.insert("object".to_string(), json!("block"));
        new_block.insert("type".to_string(), json!(tag));

        if let Some(content) = block.get(tag).and_then(Value::as_object) {
            let mut content = content.clone();
            content.remove("id");
            content.remove("created_time");
            content.remove("last_edited_time");

            if let Some(children) = block.get("children").and_then(Value::as_array) {
                let child_blocks = prepare_blocks_for_copy(children);
                if !child_blocks.is_empty() {
                    content.insert("children".to_string(), Value::Array(child_blocks));
                }
            }

            new_block.insert(tag.to_string(), Value::Object(content));
        }

        prepared.push(Value::Object(new_block));
    }

    prepared
}

/// Appends writable blocks to a parent, chunked to the batch-write limit.
///
/// One PATCH per consecutive chunk, in order; the caller receives the
/// response of the final chunk. A failure partway leaves earlier chunks
/// committed on the server.
pub fn append_children_chunked(
    client: &NotionClient,
    block_id: &str,
    children: &[Value],
) -> Result<Value, AppError> {
    if children.is_empty() {
        return Err(AppError::validation("missing_args", "No blocks to append."));
    }

    let path = format!("/blocks/{}/children", block_id);
    let mut last_response = Value::Null;
    for chunk in children.chunks(MAX_CHILDREN_PER_WRITE) {
        let body = json!({ "children": chunk });
        last_response = client.execute(Method::PATCH, &path, Some(&body), None)?;
    }
    Ok(last_response)
}

/// Duplicates a page: source record + full child tree, re-created under
/// the destination parent.
///
/// Only value-bearing property kinds are copied (see
/// [`CopyablePropertyKind`]); computed and read-only properties are
/// dropped. The first 100 stripped children ride inline on the create
/// call, the remainder goes through chunked appends.
pub fn duplicate_page(
    client: &NotionClient,
    page_id: &str,
    new_title: Option<&str>,
    new_parent_id: Option<&str>,
) -> Result<Value, AppError> {
    let pid = NotionId::from_input(page_id);

    let source = client.execute(Method::GET, &format!("/pages/{}", pid), None, None)?;
    let children = fetch_children_recursive(client, pid.as_str(), MAX_FETCH_DEPTH, 0)?;

    let parent = match new_parent_id {
        Some(id) => json!({ "page_id": NotionId::from_input(id) }),
        None => source.get("parent").cloned().unwrap_or_else(|| json!({})),
    };

    let mut properties = Map::new();
    if let Some(source_props) = source.get("properties").and_then(Value::as_object) {
        for (name, value) in source_props {
            let Some(tag) = value.get("type").and_then(Value::as_str) else {
                continue;
            };
            if tag == "title" {
                let title = match new_title {
                    Some(title) => title.to_string(),
                    None => format!("Copy of {}", extract_plain_text(value.get("title"))),
                };
                properties.insert(name.clone(), json!({ "title": simple_rich_text(&title) }));
            } else if let Some(kind) = CopyablePropertyKind::from_tag(tag) {
                let copied = value.get(kind.as_tag()).cloned().unwrap_or(Value::Null);
                properties.insert(name.clone(), json!({ (kind.as_tag()): copied }));
            }
        }
    }

    let mut create_body = json!({ "parent": parent, "properties": properties });
    if let Some(icon) = source.get("icon").filter(|v| !v.is_null()) {
        create_body["icon"] = icon.clone();
    }
    if let Some(cover) = source.get("cover").filter(|v| !v.is_null()) {
        create_body["cover"] = cover.clone();
    }

    let inline_count = children.len().min(MAX_CHILDREN_PER_WRITE);
    let top_level_blocks = prepare_blocks_for_copy(&children[..inline_count]);
    if !top_level_blocks.is_empty() {
        create_body["children"] = Value::Array(top_level_blocks);
    }

    let new_page = client.execute(Method::POST, "/pages", Some(&create_body), None)?;

    if children.len() > MAX_CHILDREN_PER_WRITE {
        let remaining = prepare_blocks_for_copy(&children[MAX_CHILDREN_PER_WRITE..]);
        if !remaining.is_empty() {
            let new_id = new_page
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    AppError::MalformedResponse("page create response missing id".to_string())
                })?;
            append_children_chunked(client, new_id, &remaining)?;
        }
    }

    Ok(json!({
        "success": true,
        "message": "Page duplicated.",
        "source_id": pid,
        "new_page": new_page,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fetched_block(block_type: &str, text: &str) -> Value {
        json!({
            "object": "block",
            "id": "11111111-2222-3333-4444-555555555555",
            "type": block_type,
            "has_children": false,
            block_type: {
                "id": "inner-id",
                "created_time": "2024-01-01T00:00:00.000Z",
                "last_edited_time": "2024-01-02T00:00:00.000Z",
                "rich_text": [{ "plain_text": text }],
            },
        })
    }

    #[test]
    fn strip_removes_ids_and_timestamps() {
        let prepared = prepare_blocks_for_copy(&[fetched_block("paragraph", "hello")]);
        assert_eq!(prepared.len(), 1);
        let content = &prepared[0]["paragraph"];
        assert!(content.get("id").is_none());
        assert!(content.get("created_time").is_none());
        assert!(content.get("last_edited_time").is_none());
        assert_eq!(content["rich_text"][0]["plain_text"], "hello");
        assert!(prepared[0].get("id").is_none());
    }

    #[test]
    fn strip_preserves_type_tags_and_order() {
        let blocks = vec![
            fetched_block("heading_1", "first"),
            fetched_block("to_do", "second"),
            fetched_block("paragraph", "third"),
        ];
        let prepared = prepare_blocks_for_copy(&blocks);
        let tags: Vec<&str> = prepared
            .iter()
            .map(|b| b["type"].as_str().unwrap())
            .collect();
        assert_eq!(tags, vec!["heading_1", "to_do", "paragraph"]);
    }

    #[test]
    fn strip_skips_unrecognized_types() {
        let blocks = vec![
            fetched_block("paragraph", "keep"),
            json!({ "object": "block", "id": "x", "unsupported": {} }),
            json!({ "object": "block", "id": "y", "type": "ai_block", "ai_block": {} }),
        ];
        let prepared = prepare_blocks_for_copy(&blocks);
        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared[0]["type"], "paragraph");
    }

    #[test]
    fn strip_recurses_into_expanded_children() {
        let mut parent = fetched_block("toggle", "outer");
        parent["has_children"] = json!(true);
        parent["children"] = json!([fetched_block("paragraph", "inner")]);

        let prepared = prepare_blocks_for_copy(&[parent]);
        let nested = &prepared[0]["toggle"]["children"][0];
        assert_eq!(nested["type"], "paragraph");
        assert!(nested["paragraph"].get("id").is_none());
        assert!(nested["paragraph"].get("created_time").is_none());
    }
}

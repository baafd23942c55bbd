// src/builders.rs
//! Body construction helpers: rich text, simple blocks, JSON arguments.
//!
//! These produce the well-formed JSON shapes the Notion write endpoints
//! expect from higher-level arguments (plain strings, CLI flags).

use crate::error::AppError;
use serde_json::{json, Value};

/// Creates a single rich text object with optional annotations and link.
pub fn make_rich_text(
    text: &str,
    bold: bool,
    italic: bool,
    code: bool,
    link: Option<&str>,
) -> Value {
    let mut rich_text = json!({
        "type": "text",
        "text": { "content": text },
        "annotations": {
            "bold": bold,
            "italic": italic,
            "strikethrough": false,
            "underline": false,
            "code": code,
            "color": "default",
        },
    });
    if let Some(url) = link {
        rich_text["text"]["link"] = json!({ "url": url });
    }
    rich_text
}

/// Plain string to a one-element rich text array.
pub fn simple_rich_text(text: &str) -> Value {
    json!([make_rich_text(text, false, false, false, None)])
}

/// Accepts either a plain string or a JSON rich text array.
pub fn parse_rich_text_input(input: &str) -> Value {
    if let Ok(parsed) = serde_json::from_str::<Value>(input) {
        if parsed.is_array() {
            return parsed;
        }
    }
    simple_rich_text(input)
}

/// Extracts plain text from a rich text array.
pub fn extract_plain_text(rich_text_array: Option<&Value>) -> String {
    let Some(items) = rich_text_array.and_then(Value::as_array) else {
        return String::new();
    };
    items
        .iter()
        .map(|item| {
            item.get("plain_text")
                .and_then(Value::as_str)
                .or_else(|| {
                    item.get("text")
                        .and_then(|t| t.get("content"))
                        .and_then(Value::as_str)
                })
                .unwrap_or("")
        })
        .collect()
}

/// Creates a paragraph block from plain text.
pub fn make_paragraph(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "paragraph",
        "paragraph": { "rich_text": simple_rich_text(text) },
    })
}

/// Creates a heading block (level clamped to 1-3).
pub fn make_heading(text: &str, level: u8) -> Value {
    let key = format!("heading_{}", level.clamp(1, 3));
    let mut block = json!({
        "object": "block",
        "type": key.clone(),
    });
    block[&key] = json!({ "rich_text": simple_rich_text(text) });
    block
}

/// Creates a to-do block.
pub fn make_todo(text: &str, checked: bool) -> Value {
    json!({
        "object": "block",
        "type": "to_do",
        "to_do": {
            "rich_text": simple_rich_text(text),
            "checked": checked,
        },
    })
}

/// Creates a bulleted list item block.
pub fn make_bullet(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "bulleted_list_item",
        "bulleted_list_item": { "rich_text": simple_rich_text(text) },
    })
}

/// Creates a numbered list item block.
pub fn make_numbered(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "numbered_list_item",
        "numbered_list_item": { "rich_text": simple_rich_text(text) },
    })
}

/// Parses a JSON string argument, naming the offending flag on failure.
pub fn parse_json_arg(value: &str, flag_name: &str) -> Result<Value, AppError> {
    serde_json::from_str(value).map_err(|e| {
        AppError::validation("invalid_json", format!("Invalid JSON for {}: {}", flag_name, e))
    })
}

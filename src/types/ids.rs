// src/types/ids.rs
//! Notion identifier normalization.
//!
//! Notion accepts page/database/block identifiers in a canonical dashed
//! UUID form, but users paste workspace URLs, bare 32-hex strings, and
//! "Title-<hex>" URL tails. `normalize_id` turns any of those into the
//! canonical form; anything else passes through unchanged so callers can
//! hand foreign identifiers (e.g. `"me"`) straight to the API.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref DASHED_UUID: Regex = Regex::new(
        r"^[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12}$"
    )
    .expect("dashed UUID regex is valid");
    static ref DASHED_UUID_ANYWHERE: Regex = Regex::new(
        r"[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12}"
    )
    .expect("dashed UUID search regex is valid");
    static ref HEX32_TERMINATED: Regex =
        Regex::new(r"([a-fA-F0-9]{32})(?:\?|#|$)").expect("terminated hex regex is valid");
    static ref HEX32_SUFFIX: Regex =
        Regex::new(r"([a-fA-F0-9]{32})$").expect("suffix hex regex is valid");
}

/// Formats 32 hex characters as a lowercase dashed UUID (8-4-4-4-12).
pub fn format_dashed(hex32: &str) -> String {
    debug_assert_eq!(hex32.len(), 32);
    format!(
        "{}-{}-{}-{}-{}",
        &hex32[0..8],
        &hex32[8..12],
        &hex32[12..16],
        &hex32[16..20],
        &hex32[20..32]
    )
    .to_lowercase()
}

/// Extracts a canonical dashed-UUID identifier from a URL or loosely
/// formatted ID string.
///
/// Returns the input unchanged when no identifier can be derived. That is
/// not an error condition: already-canonical and foreign identifiers pass
/// through untouched.
pub fn normalize_id(id_or_url: &str) -> String {
    if id_or_url.is_empty() {
        return id_or_url.to_string();
    }

    // Already a dashed UUID
    if DASHED_UUID.is_match(id_or_url) {
        return id_or_url.to_string();
    }

    // Workspace URLs
    if id_or_url.contains("notion.so") || id_or_url.contains("notion.site") {
        let clean = id_or_url
            .split('?')
            .next()
            .unwrap_or(id_or_url)
            .split('#')
            .next()
            .unwrap_or(id_or_url);

        if let Some(m) = DASHED_UUID_ANYWHERE.find(clean) {
            return m.as_str().to_string();
        }
        if let Some(caps) = HEX32_TERMINATED.captures(id_or_url) {
            return format_dashed(&caps[1]);
        }
        // "Title-<hex>" at the end of the final path segment
        let last = clean.trim_end_matches('/').rsplit('/').next().unwrap_or("");
        if let Some(caps) = HEX32_SUFFIX.captures(last) {
            return format_dashed(&caps[1]);
        }
    }

    // Bare 32-char hex, possibly with interspersed dashes
    let raw: String = id_or_url.replace('-', "");
    if raw.len() == 32 && raw.chars().all(|c| c.is_ascii_hexdigit()) {
        return format_dashed(&raw);
    }

    id_or_url.to_string()
}

/// A Notion object identifier in its normalized form.
///
/// Construction never fails: input that cannot be normalized is carried
/// through verbatim and left to the API to reject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotionId(String);

impl NotionId {
    /// Normalizes a URL or loosely formatted identifier.
    pub fn from_input(input: &str) -> Self {
        NotionId(normalize_id(input.trim()))
    }

    /// Returns the identifier as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for NotionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NotionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(NotionId(value))
    }
}

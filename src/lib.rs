// src/lib.rs
//! notionctl library — typed, rate-limited access to the Notion API.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `AppError`, `NotionErrorCode`, `ValidationError`
//! - **Configuration** — `Cli`, `Command`, `ClientConfig` and per-command args
//! - **Domain types** — `NotionId`, `ApiKey`, `BlockType`, `CopyablePropertyKind`
//! - **API client** — `NotionClient`, the `HttpTransport` seam, pagination
//! - **Operations** — per-endpoint functions plus the recursive tree
//!   operations (deep fetch, copy preparation, batched writes, duplication)

pub mod api;
pub mod builders;
pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod ops;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{Cli, ClientConfig, Command};

// --- Domain Types ---
pub use crate::model::{BlockType, CopyablePropertyKind};
pub use crate::types::{normalize_id, ApiKey, NotionId};

// --- API Client ---
pub use crate::api::{
    Collected, HttpTransport, NotionClient, PageEnvelope, ReqwestTransport, WireRequest,
    WireResponse,
};

// --- Tree Operations ---
pub use crate::ops::{
    append_children_chunked, duplicate_page, fetch_children_recursive, prepare_blocks_for_copy,
};

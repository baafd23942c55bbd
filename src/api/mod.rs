// src/api/mod.rs
//! Notion API interaction — rate-limited requests and cursor pagination.
//!
//! The module separates engine logic from I/O: [`NotionClient`] owns the
//! retry/rate-limit/pagination behavior, while the [`HttpTransport`] trait
//! is the seam to the actual HTTP stack. Business logic above this module
//! never touches HTTP detail.

pub mod client;
pub mod pagination;
pub mod transport;

pub use client::NotionClient;
pub use pagination::{Collected, PageEnvelope};
pub use transport::{HttpTransport, ReqwestTransport, WireRequest, WireResponse};

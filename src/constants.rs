// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains. Reading
//! these should tell you how the client behaves at the API boundary:
//! how fast it sends, how often it retries, how deep it recurses.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// Base URL for all Notion API requests.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// The `Notion-Version` header value sent with every request.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// How many objects the Notion API returns per page of results.
///
/// The API maximum is 100. We use the maximum to minimize round-trips
/// during pagination and recursive fetching.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Maximum number of children accepted by a single block-append or
/// page-create call. Longer sequences must be chunked.
pub const MAX_CHILDREN_PER_WRITE: usize = 100;

// ---------------------------------------------------------------------------
// Rate limiting and retry
// ---------------------------------------------------------------------------

/// Minimum spacing between physical requests, per client instance.
///
/// The Notion API allows roughly 3 requests per second on average;
/// 340ms of spacing keeps a single client safely under that ceiling.
pub const MIN_REQUEST_INTERVAL_MS: u64 = 340;

/// Total attempts for a logical request under sustained 429 responses.
/// Only rate-limit responses consume this budget; other errors fail
/// immediately.
pub const MAX_RATE_LIMIT_ATTEMPTS: u32 = 3;

/// Retry delay assumed when a 429 response carries no `Retry-After` header.
pub const DEFAULT_RETRY_AFTER_SECS: f64 = 1.0;

// ---------------------------------------------------------------------------
// Recursive fetch boundaries
// ---------------------------------------------------------------------------

/// Maximum nesting depth when recursively fetching block children.
///
/// Notion pages can nest arbitrarily deep. Hitting this bound returns an
/// empty child set at the cutoff rather than an error.
pub const MAX_FETCH_DEPTH: u8 = 10;

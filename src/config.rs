// src/config.rs
//! Command-line surface and resolved client configuration.
//!
//! Each subcommand owns an args struct; the operation functions in
//! `ops` consume these directly. Credential resolution is the only
//! environment access: the bearer token comes from `NOTION_API_KEY`.

use crate::error::AppError;
use crate::types::ApiKey;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about = "Typed, rate-limited access to the Notion API", long_about = None)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify the configured API token
    Setup,
    /// Retrieve a page, database, or block by ID or URL
    Fetch(FetchArgs),
    /// Search the workspace
    Search(SearchArgs),
    /// Create a new page
    CreatePage(CreatePageArgs),
    /// Update a page's properties, content, or metadata
    UpdatePage(UpdatePageArgs),
    /// Create a new database
    CreateDatabase(CreateDatabaseArgs),
    /// Update a database's schema or metadata
    UpdateDatabase(UpdateDatabaseArgs),
    /// Query a database with filters and sorts
    QueryDatabase(QueryDatabaseArgs),
    /// Query meeting notes (composite search plus local filtering)
    QueryMeetingNotes(QueryMeetingNotesArgs),
    /// Add a comment to a page
    CreateComment(CreateCommentArgs),
    /// Get all comments on a page or block
    GetComments(GetCommentsArgs),
    /// List or look up workspace users
    GetUsers(GetUsersArgs),
    /// List teamspaces (workspace users proxy; the public API has no teams endpoint)
    GetTeams(GetTeamsArgs),
    /// Move pages to a new parent
    MovePage(MovePageArgs),
    /// Duplicate a page with its full content tree
    DuplicatePage(DuplicatePageArgs),
    /// Block-level operations (get, children, append, update, delete)
    Blocks(BlocksArgs),
}

/// What kind of object an identifier refers to, when the caller knows.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Page,
    Database,
    Block,
}

/// Search result filter on the `object` property.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFilter {
    Page,
    Database,
}

impl SearchFilter {
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Database => "database",
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Parent reference kind for page creation and moves.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[value(rename_all = "snake_case")]
pub enum ParentKind {
    #[default]
    PageId,
    DatabaseId,
}

impl ParentKind {
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::PageId => "page_id",
            Self::DatabaseId => "database_id",
        }
    }
}

/// Relative date window for the meeting-notes query.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[value(rename_all = "snake_case")]
pub enum DateRelative {
    PastWeek,
    PastMonth,
    ThisWeek,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAction {
    Get,
    Children,
    Append,
    Update,
    Delete,
}

#[derive(Args, Debug, Default)]
pub struct FetchArgs {
    /// Page, database, or block ID/URL
    pub id: String,

    /// Object type (tries page, then database, then block when omitted)
    #[arg(long = "type", value_enum)]
    pub object_type: Option<ObjectKind>,

    /// Recursively include block children
    #[arg(long, default_value_t = false)]
    pub include_children: bool,
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Restrict results to pages or databases
    #[arg(long, value_enum)]
    pub filter: Option<SearchFilter>,

    /// Sort by last edited time
    #[arg(long, value_enum)]
    pub sort: Option<SortDirection>,

    /// Maximum number of results to collect
    #[arg(long)]
    pub max_results: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct CreatePageArgs {
    /// Parent page or database ID/URL
    #[arg(long, required = true)]
    pub parent_id: String,

    /// Page title
    #[arg(long)]
    pub title: Option<String>,

    /// Parent reference kind
    #[arg(long, value_enum, default_value = "page_id")]
    pub parent_type: ParentKind,

    /// Name of the title property when creating under a database
    #[arg(long, default_value = "Name")]
    pub title_property: String,

    /// Properties object as JSON
    #[arg(long)]
    pub properties_json: Option<String>,

    /// Content blocks array as JSON
    #[arg(long)]
    pub content_json: Option<String>,

    /// Content as a plain-text paragraph
    #[arg(long)]
    pub content_text: Option<String>,

    /// Page icon emoji
    #[arg(long)]
    pub icon_emoji: Option<String>,

    /// Cover image URL
    #[arg(long)]
    pub cover_url: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct UpdatePageArgs {
    /// Page ID or URL
    pub page_id: String,

    /// Properties object as JSON
    #[arg(long)]
    pub properties_json: Option<String>,

    /// Update the page title
    #[arg(long)]
    pub title: Option<String>,

    /// Archive the page
    #[arg(long, default_value_t = false)]
    pub archive: bool,

    /// Restore the page from the archive
    #[arg(long, default_value_t = false)]
    pub unarchive: bool,

    /// Update icon emoji
    #[arg(long)]
    pub icon_emoji: Option<String>,

    /// Update cover URL
    #[arg(long)]
    pub cover_url: Option<String>,

    /// Blocks array as JSON to append to the page content
    #[arg(long)]
    pub append_blocks_json: Option<String>,

    /// Plain text paragraph to append to the page content
    #[arg(long)]
    pub append_text: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct CreateDatabaseArgs {
    /// Parent page ID/URL
    #[arg(long, required = true)]
    pub parent_id: String,

    /// Database title
    #[arg(long, required = true)]
    pub title: String,

    /// Schema properties object as JSON
    #[arg(long, required = true)]
    pub properties_json: String,

    /// Database description
    #[arg(long)]
    pub description: Option<String>,

    /// Create as an inline database
    #[arg(long, default_value_t = false)]
    pub inline: bool,

    /// Database icon emoji
    #[arg(long)]
    pub icon_emoji: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct UpdateDatabaseArgs {
    /// Database ID or URL
    pub database_id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// Schema properties to add or change, as JSON
    #[arg(long)]
    pub properties_json: Option<String>,

    /// Comma-separated property names to remove
    #[arg(long)]
    pub remove_properties: Option<String>,

    /// Archive the database
    #[arg(long, default_value_t = false)]
    pub archive: bool,
}

#[derive(Args, Debug, Default)]
pub struct QueryDatabaseArgs {
    /// Database ID or URL
    pub database_id: String,

    /// Filter object as JSON
    #[arg(long)]
    pub filter_json: Option<String>,

    /// Sorts array as JSON
    #[arg(long)]
    pub sorts_json: Option<String>,

    /// Maximum number of results to collect
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Page size for manual pagination (max 100)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Start cursor for manual pagination
    #[arg(long)]
    pub cursor: Option<String>,

    /// Return a single page instead of auto-paginating
    #[arg(long, default_value_t = false)]
    pub no_auto_paginate: bool,
}

#[derive(Args, Debug, Default)]
pub struct QueryMeetingNotesArgs {
    /// Filter by title keyword
    #[arg(long)]
    pub title_contains: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub date_from: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub date_to: Option<String>,

    /// Relative creation-date window
    #[arg(long, value_enum)]
    pub date_relative: Option<DateRelative>,

    /// Maximum number of results
    #[arg(long, default_value_t = 50)]
    pub max_results: usize,
}

#[derive(Args, Debug, Default)]
pub struct CreateCommentArgs {
    /// Page ID to comment on
    #[arg(long)]
    pub parent_id: Option<String>,

    /// Discussion thread to reply to
    #[arg(long)]
    pub discussion_id: Option<String>,

    /// Comment text
    #[arg(long)]
    pub text: Option<String>,

    /// Rich text array as JSON
    #[arg(long)]
    pub rich_text_json: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct GetCommentsArgs {
    /// Page or block ID
    pub page_id: String,

    /// Maximum number of comments to collect
    #[arg(long)]
    pub max_results: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct GetUsersArgs {
    /// Filter by name or email
    #[arg(long)]
    pub query: Option<String>,

    /// Look up a single user by ID (or "me" for the bot user)
    #[arg(long)]
    pub user_id: Option<String>,

    /// Maximum number of users to collect
    #[arg(long)]
    pub max_results: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct GetTeamsArgs {
    /// Filter by name
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct MovePageArgs {
    /// Comma-separated page IDs or URLs
    pub page_ids: String,

    /// New parent ID/URL
    #[arg(long, required = true)]
    pub new_parent_id: String,

    /// New parent reference kind
    #[arg(long, value_enum, default_value = "page_id")]
    pub new_parent_type: ParentKind,
}

#[derive(Args, Debug, Default)]
pub struct DuplicatePageArgs {
    /// Page ID or URL to duplicate
    pub page_id: String,

    /// Title for the copy (defaults to "Copy of <source title>")
    #[arg(long)]
    pub new_title: Option<String>,

    /// Parent for the copy (defaults to the source page's parent)
    #[arg(long)]
    pub new_parent_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct BlocksArgs {
    /// Block action to perform
    #[arg(value_enum)]
    pub action: BlockAction,

    /// Block ID or URL
    #[arg(long)]
    pub block_id: Option<String>,

    /// Blocks array as JSON (for append)
    #[arg(long)]
    pub blocks_json: Option<String>,

    /// Single block object as JSON (for update)
    #[arg(long)]
    pub block_json: Option<String>,

    /// Plain text paragraph (for append)
    #[arg(long)]
    pub text: Option<String>,

    /// Maximum number of children to collect
    #[arg(long)]
    pub max_results: Option<usize>,
}

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: ApiKey,
}

impl ClientConfig {
    /// Resolves configuration from the environment.
    pub fn resolve() -> Result<Self, AppError> {
        let api_key_str = std::env::var("NOTION_API_KEY").map_err(|_| {
            AppError::MissingConfiguration(
                "NOTION_API_KEY environment variable not set".to_string(),
            )
        })?;
        let api_key = ApiKey::new(api_key_str)?;
        Ok(ClientConfig { api_key })
    }
}

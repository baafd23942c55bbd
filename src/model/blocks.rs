// src/model/blocks.rs
//! Block type tags the client recognizes.
//!
//! The Notion API keys a block's content under its own type tag
//! (`"paragraph"`, `"heading_1"`, `"to_do"`, …). Copy-preparation must
//! branch on that tag, so it is modeled as an enum rather than a loose
//! string: a tag outside this vocabulary cannot be re-created and is
//! skipped during reconstruction.

use std::fmt;

/// A recognized block type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletedListItem,
    NumberedListItem,
    ToDo,
    Toggle,
    Quote,
    Callout,
    Code,
    Divider,
    Image,
    Video,
    Audio,
    File,
    Pdf,
    Bookmark,
    Embed,
    Equation,
    TableOfContents,
    Breadcrumb,
    ColumnList,
    Column,
    LinkPreview,
    LinkToPage,
    SyncedBlock,
    Template,
    Table,
    TableRow,
    ChildPage,
    ChildDatabase,
}

impl BlockType {
    /// Parses an API type tag. Returns `None` for tags this client
    /// cannot re-create (including Notion's own `"unsupported"`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        let block_type = match tag {
            "paragraph" => Self::Paragraph,
            "heading_1" => Self::Heading1,
            "heading_2" => Self::Heading2,
            "heading_3" => Self::Heading3,
            "bulleted_list_item" => Self::BulletedListItem,
            "numbered_list_item" => Self::NumberedListItem,
            "to_do" => Self::ToDo,
            "toggle" => Self::Toggle,
            "quote" => Self::Quote,
            "callout" => Self::Callout,
            "code" => Self::Code,
            "divider" => Self::Divider,
            "image" => Self::Image,
            "video" => Self::Video,
            "audio" => Self::Audio,
            "file" => Self::File,
            "pdf" => Self::Pdf,
            "bookmark" => Self::Bookmark,
            "embed" => Self::Embed,
            "equation" => Self::Equation,
            "table_of_contents" => Self::TableOfContents,
            "breadcrumb" => Self::Breadcrumb,
            "column_list" => Self::ColumnList,
            "column" => Self::Column,
            "link_preview" => Self::LinkPreview,
            "link_to_page" => Self::LinkToPage,
            "synced_block" => Self::SyncedBlock,
            "template" => Self::Template,
            "table" => Self::Table,
            "table_row" => Self::TableRow,
            "child_page" => Self::ChildPage,
            "child_database" => Self::ChildDatabase,
            _ => return None,
        };
        Some(block_type)
    }

    /// The API type tag, which is also the content key on the block.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading1 => "heading_1",
            Self::Heading2 => "heading_2",
            Self::Heading3 => "heading_3",
            Self::BulletedListItem => "bulleted_list_item",
            Self::NumberedListItem => "numbered_list_item",
            Self::ToDo => "to_do",
            Self::Toggle => "toggle",
            Self::Quote => "quote",
            Self::Callout => "callout",
            Self::Code => "code",
            Self::Divider => "divider",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::File => "file",
            Self::Pdf => "pdf",
            Self::Bookmark => "bookmark",
            Self::Embed => "embed",
            Self::Equation => "equation",
            Self::TableOfContents => "table_of_contents",
            Self::Breadcrumb => "breadcrumb",
            Self::ColumnList => "column_list",
            Self::Column => "column",
            Self::LinkPreview => "link_preview",
            Self::LinkToPage => "link_to_page",
            Self::SyncedBlock => "synced_block",
            Self::Template => "template",
            Self::Table => "table",
            Self::TableRow => "table_row",
            Self::ChildPage => "child_page",
            Self::ChildDatabase => "child_database",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

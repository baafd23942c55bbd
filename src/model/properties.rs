// src/model/properties.rs
//! Page property kinds that survive duplication.
//!
//! Only value-bearing properties can be written back through the create
//! endpoint. Computed and read-only kinds (formula, rollup, created_by,
//! relations with rollups behind them, …) are dropped during page
//! duplication; the title property is rebuilt separately so the copy can
//! be renamed.

/// A property type tag whose value can be copied verbatim into a
/// page-create request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyablePropertyKind {
    RichText,
    Number,
    Select,
    MultiSelect,
    Date,
    Checkbox,
    Url,
    Email,
    PhoneNumber,
}

impl CopyablePropertyKind {
    /// Parses an API property type tag; `None` means the property is
    /// dropped from the duplicate.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "rich_text" => Self::RichText,
            "number" => Self::Number,
            "select" => Self::Select,
            "multi_select" => Self::MultiSelect,
            "date" => Self::Date,
            "checkbox" => Self::Checkbox,
            "url" => Self::Url,
            "email" => Self::Email,
            "phone_number" => Self::PhoneNumber,
            _ => return None,
        };
        Some(kind)
    }

    /// The API type tag, which is also the value key on the property.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::RichText => "rich_text",
            Self::Number => "number",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Date => "date",
            Self::Checkbox => "checkbox",
            Self::Url => "url",
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copyable_tags_round_trip() {
        for tag in ["rich_text", "multi_select", "phone_number", "checkbox"] {
            assert_eq!(CopyablePropertyKind::from_tag(tag).unwrap().as_tag(), tag);
        }
    }

    #[test]
    fn computed_kinds_are_dropped() {
        for tag in ["formula", "rollup", "created_time", "last_edited_by", "title"] {
            assert_eq!(CopyablePropertyKind::from_tag(tag), None);
        }
    }
}

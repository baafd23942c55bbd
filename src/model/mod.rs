// src/model/mod.rs
//! Typed vocabulary for the Notion document tree.
//!
//! API payloads stay as JSON trees, but the two places where behavior
//! branches on a type tag — block reconstruction and property copying —
//! go through real enums so the set of recognized tags is explicit and
//! exhaustive.

pub mod blocks;
pub mod properties;

pub use blocks::BlockType;
pub use properties::CopyablePropertyKind;

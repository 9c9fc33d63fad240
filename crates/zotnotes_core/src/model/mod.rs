//! Library domain model decoded from the Zotero Web API.
//!
//! # Responsibility
//! - Define the collection/item/group shapes used by the note pipeline.
//! - Keep wire-format quirks (e.g. `parentCollection: false`) at decode time.
//!
//! # Invariants
//! - Every collection and item is identified by its stable remote key.
//! - Unknown JSON fields are ignored; missing optional fields default.

pub mod collection;
pub mod item;
pub mod note;

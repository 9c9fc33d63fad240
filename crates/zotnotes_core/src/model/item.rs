//! Library item and group models.
//!
//! # Responsibility
//! - Decode item envelopes (`key`, `data`, `meta`) as returned by the API.
//! - Provide item-type predicates used by note selection.
//!
//! # Invariants
//! - `item_type` is kept verbatim; predicates never normalize case.
//! - Absent optional fields decode to `None`/empty, never to an error.

use serde::Deserialize;

/// Stable remote item key.
pub type ItemKey = String;

const ITEM_TYPE_ATTACHMENT: &str = "attachment";
const ITEM_TYPE_NOTE: &str = "note";

/// One library item: a document, a note or an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item {
    pub key: ItemKey,
    pub data: ItemData,
    #[serde(default)]
    pub meta: ItemMeta,
}

/// Editable item fields. Only the fields the note pipeline reads are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    #[serde(default)]
    pub key: ItemKey,
    #[serde(default)]
    pub item_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    /// HTML body; present on note items only.
    #[serde(default)]
    pub note: Option<String>,
    /// Key of the owning document; present on child notes/attachments.
    #[serde(default)]
    pub parent_item: Option<ItemKey>,
    #[serde(default)]
    pub collections: Vec<String>,
}

/// Server-computed metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMeta {
    #[serde(default)]
    pub creator_summary: Option<String>,
}

impl Item {
    pub fn is_attachment(&self) -> bool {
        self.data.item_type == ITEM_TYPE_ATTACHMENT
    }

    /// Matches `note` and any item type containing it.
    pub fn is_note(&self) -> bool {
        self.data.item_type.contains(ITEM_TYPE_NOTE)
    }

    /// Matches the `note` item type only.
    pub fn is_plain_note(&self) -> bool {
        self.data.item_type == ITEM_TYPE_NOTE
    }

    /// Note body, or empty text for non-note items.
    pub fn note_body(&self) -> &str {
        self.data.note.as_deref().unwrap_or_default()
    }
}

/// One group library visible to the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "GroupEnvelope")]
pub struct Group {
    pub id: u64,
    pub name: String,
}

#[derive(Deserialize)]
struct GroupEnvelope {
    id: u64,
    #[serde(default)]
    data: GroupData,
}

#[derive(Default, Deserialize)]
struct GroupData {
    #[serde(default)]
    name: String,
}

impl From<GroupEnvelope> for Group {
    fn from(value: GroupEnvelope) -> Self {
        Self {
            id: value.id,
            name: value.data.name,
        }
    }
}

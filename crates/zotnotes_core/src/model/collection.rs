//! Collection model and key-indexed hierarchy view.
//!
//! # Responsibility
//! - Decode collections from API envelopes into a flat record.
//! - Resolve names, breadcrumbs and the sorted tree for listing.
//!
//! # Invariants
//! - `parent == None` means root-level collection.
//! - Name lookup returns the first match in fetch order.
//! - Sibling order in `tree()` is case-insensitive by name.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// Stable remote collection key, e.g. `55GCTGSE`.
pub type CollectionKey = String;

/// One collection of a library.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "CollectionEnvelope")]
pub struct Collection {
    pub key: CollectionKey,
    pub name: String,
    /// Parent collection key. `None` means root-level collection.
    pub parent: Option<CollectionKey>,
}

impl Collection {
    pub fn new(key: impl Into<String>, name: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            parent: parent.map(str::to_string),
        }
    }
}

#[derive(Deserialize)]
struct CollectionEnvelope {
    data: CollectionData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionData {
    key: String,
    #[serde(default)]
    name: String,
    #[serde(default, deserialize_with = "deserialize_parent_key")]
    parent_collection: Option<String>,
}

impl From<CollectionEnvelope> for Collection {
    fn from(value: CollectionEnvelope) -> Self {
        Self {
            key: value.data.key,
            name: value.data.name,
            parent: value.data.parent_collection,
        }
    }
}

// The API sends `false` for root collections instead of null.
fn deserialize_parent_key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(key) if !key.trim().is_empty() => Some(key),
        _ => None,
    })
}

/// Sorted hierarchy node produced by [`CollectionIndex::tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNode {
    pub key: CollectionKey,
    pub name: String,
    pub children: Vec<CollectionNode>,
}

/// Key-indexed view over every collection of one library.
#[derive(Debug, Clone, Default)]
pub struct CollectionIndex {
    collections: Vec<Collection>,
    by_key: HashMap<CollectionKey, usize>,
}

impl CollectionIndex {
    /// Builds the index. Later duplicates of a key replace earlier ones in
    /// key lookups but keep their fetch position for name lookups.
    pub fn new(collections: Vec<Collection>) -> Self {
        let by_key = collections
            .iter()
            .enumerate()
            .map(|(position, collection)| (collection.key.clone(), position))
            .collect();
        Self {
            collections,
            by_key,
        }
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Collections in fetch order.
    pub fn iter(&self) -> impl Iterator<Item = &Collection> {
        self.collections.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Collection> {
        self.by_key
            .get(key)
            .and_then(|position| self.collections.get(*position))
    }

    /// Returns the key of the first collection named exactly `name`.
    pub fn find_key_by_name(&self, name: &str) -> Option<&str> {
        self.collections
            .iter()
            .find(|collection| collection.name == name)
            .map(|collection| collection.key.as_str())
    }

    /// Returns `Parent/Child` when the parent is known, else `Child`.
    ///
    /// Returns `None` when `key` itself is unknown.
    pub fn breadcrumb(&self, key: &str) -> Option<String> {
        let collection = self.get(key)?;
        let parent = collection
            .parent
            .as_deref()
            .and_then(|parent_key| self.get(parent_key));
        Some(match parent {
            Some(parent) => format!("{}/{}", parent.name, collection.name),
            None => collection.name.clone(),
        })
    }

    /// Builds the root-first hierarchy with case-insensitive sibling order.
    ///
    /// Collections whose parent is missing from the index are unreachable.
    pub fn tree(&self) -> Vec<CollectionNode> {
        let mut children_of: HashMap<&str, Vec<&Collection>> = HashMap::new();
        let mut roots = Vec::new();
        for collection in &self.collections {
            match collection.parent.as_deref() {
                Some(parent) => children_of.entry(parent).or_default().push(collection),
                None => roots.push(collection),
            }
        }

        sort_by_folded_name(&mut roots);
        roots
            .into_iter()
            .map(|root| build_node(root, &children_of))
            .collect()
    }
}

fn build_node(
    collection: &Collection,
    children_of: &HashMap<&str, Vec<&Collection>>,
) -> CollectionNode {
    let mut children = children_of
        .get(collection.key.as_str())
        .cloned()
        .unwrap_or_default();
    sort_by_folded_name(&mut children);
    CollectionNode {
        key: collection.key.clone(),
        name: collection.name.clone(),
        children: children
            .into_iter()
            .map(|child| build_node(child, children_of))
            .collect(),
    }
}

pub(crate) fn sort_by_folded_name(collections: &mut [&Collection]) {
    collections.sort_by_cached_key(|collection| collection.name.to_lowercase());
}

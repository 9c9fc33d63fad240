//! Collection listing use-case service.
//!
//! # Responsibility
//! - Render the collection hierarchy, per-collection note counts and group
//!   listings as console text.
//! - Emit the collection picker JSON consumed by launcher workflows.
//!
//! # Invariants
//! - Sibling order is case-insensitive by name everywhere.
//! - Note counts include only items of type `note` that are not import
//!   placeholders.

use crate::library::{LibraryResult, LibrarySource};
use crate::model::collection::{sort_by_folded_name, CollectionIndex, CollectionNode};
use crate::model::item::{Group, Item};
use crate::service::note_service::is_placeholder_note;
use log::info;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

const PICKER_SUBTITLE: &str = "\u{21a9} or \u{21e5} to select";
const PICKER_INDENT: &[u8] = b"    ";

/// Note count for one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNoteCount {
    pub key: String,
    pub name: String,
    pub notes: usize,
}

/// Collection listing facade over a library source.
pub struct CollectionService<S: LibrarySource> {
    source: S,
    index: CollectionIndex,
}

impl<S: LibrarySource> CollectionService<S> {
    pub fn new(source: S, index: CollectionIndex) -> Self {
        Self { source, index }
    }

    /// Fetches all collections and builds the service.
    pub fn load(source: S) -> LibraryResult<Self> {
        let index = CollectionIndex::new(source.collections()?);
        Ok(Self::new(source, index))
    }

    pub fn index(&self) -> &CollectionIndex {
        &self.index
    }

    pub fn tree_listing(&self) -> String {
        render_collection_tree(&self.index)
    }

    pub fn picker_json(&self) -> Result<String, serde_json::Error> {
        collection_picker_json(&self.index)
    }

    /// Counts plain notes per collection, sorted by name.
    ///
    /// Issues one listing request per collection.
    pub fn note_counts(&self) -> LibraryResult<Vec<CollectionNoteCount>> {
        let mut counts = Vec::with_capacity(self.index.len());
        for collection in self.index.iter() {
            let items = self.source.collection_items(&collection.key)?;
            counts.push(CollectionNoteCount {
                key: collection.key.clone(),
                name: collection.name.clone(),
                notes: items.iter().filter(|item| is_countable_note(item)).count(),
            });
        }
        counts.sort_by_cached_key(|count| count.name.to_lowercase());
        info!(
            "event=note_counts module=collections status=ok collections={}",
            counts.len()
        );
        Ok(counts)
    }

    pub fn groups(&self) -> LibraryResult<Vec<Group>> {
        self.source.groups()
    }
}

fn is_countable_note(item: &Item) -> bool {
    item.is_plain_note() && !is_placeholder_note(item)
}

/// Renders `Collections:` followed by an indented `- name (Key: key)` tree.
///
/// When no collection is a root, every collection is listed flat with its
/// parent key instead.
pub fn render_collection_tree(index: &CollectionIndex) -> String {
    let mut lines = vec!["Collections:".to_string()];
    let roots = index.tree();
    if roots.is_empty() {
        lines.push("No collections found or all collections have unknown parents.".to_string());
        let mut flat: Vec<_> = index.iter().collect();
        sort_by_folded_name(&mut flat);
        for collection in flat {
            lines.push(format!(
                "- {} (Key: {}, Parent: {})",
                collection.name,
                collection.key,
                collection.parent.as_deref().unwrap_or_default()
            ));
        }
    } else {
        for root in &roots {
            push_tree_lines(root, 0, &mut lines);
        }
    }
    lines.join("\n")
}

fn push_tree_lines(node: &CollectionNode, depth: usize, lines: &mut Vec<String>) {
    lines.push(format!(
        "{}- {} (Key: {})",
        "  ".repeat(depth),
        node.name,
        node.key
    ));
    for child in &node.children {
        push_tree_lines(child, depth + 1, lines);
    }
}

pub fn render_note_counts(counts: &[CollectionNoteCount]) -> String {
    let mut lines = vec!["Collections with notes:".to_string()];
    lines.extend(counts.iter().map(|count| {
        let plural = if count.notes == 1 { "" } else { "s" };
        format!("- {}: {} note{plural}", count.name, count.notes)
    }));
    lines.join("\n")
}

pub fn render_groups(groups: &[Group]) -> String {
    let mut lines = vec!["Groups:".to_string()];
    lines.extend(
        groups
            .iter()
            .map(|group| format!("- {} (ID: {})", group.name, group.id)),
    );
    lines.join("\n")
}

#[derive(Serialize)]
struct PickerDocument<'a> {
    items: Vec<PickerEntry<'a>>,
}

// Field order is alphabetical so the output keys come out sorted.
#[derive(Serialize)]
struct PickerEntry<'a> {
    arg: &'a str,
    autocomplete: &'a str,
    subtitle: &'static str,
    title: &'a str,
    uid: &'a str,
}

/// Builds launcher picker JSON with one entry per collection name.
pub fn collection_picker_json(index: &CollectionIndex) -> Result<String, serde_json::Error> {
    let document = PickerDocument {
        items: index
            .iter()
            .map(|collection| PickerEntry {
                arg: &collection.name,
                autocomplete: &collection.name,
                subtitle: PICKER_SUBTITLE,
                title: &collection.name,
                uid: &collection.name,
            })
            .collect(),
    };

    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(PICKER_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::{
        collection_picker_json, render_collection_tree, render_note_counts, CollectionNoteCount,
    };
    use crate::model::collection::{Collection, CollectionIndex};

    #[test]
    fn tree_listing_indents_children() {
        let index = CollectionIndex::new(vec![
            Collection::new("B", "beta", None),
            Collection::new("A", "Alpha", None),
            Collection::new("C", "child", Some("A")),
        ]);
        assert_eq!(
            render_collection_tree(&index),
            "Collections:\n- Alpha (Key: A)\n  - child (Key: C)\n- beta (Key: B)"
        );
    }

    #[test]
    fn tree_listing_falls_back_to_flat_list_without_roots() {
        let index = CollectionIndex::new(vec![
            Collection::new("X", "orphan", Some("GONE")),
            Collection::new("Y", "Another", Some("GONE")),
        ]);
        let rendered = render_collection_tree(&index);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(
            lines[1],
            "No collections found or all collections have unknown parents."
        );
        assert_eq!(lines[2], "- Another (Key: Y, Parent: GONE)");
        assert_eq!(lines[3], "- orphan (Key: X, Parent: GONE)");
    }

    #[test]
    fn note_counts_pluralize() {
        let counts = vec![
            CollectionNoteCount {
                key: "A".to_string(),
                name: "One".to_string(),
                notes: 1,
            },
            CollectionNoteCount {
                key: "B".to_string(),
                name: "Two".to_string(),
                notes: 0,
            },
        ];
        assert_eq!(
            render_note_counts(&counts),
            "Collections with notes:\n- One: 1 note\n- Two: 0 notes"
        );
    }

    #[test]
    fn picker_json_uses_sorted_keys_and_wide_indent() {
        let index = CollectionIndex::new(vec![Collection::new("A", "Café", None)]);
        let json = collection_picker_json(&index).unwrap();
        assert!(json.contains("\n    \"items\": ["));
        assert!(json.contains("\"title\": \"Café\""));
        let arg = json.find("\"arg\"").unwrap();
        let uid = json.find("\"uid\"").unwrap();
        assert!(arg < uid);
    }
}

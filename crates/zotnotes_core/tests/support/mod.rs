#![allow(dead_code)]

use serde_json::json;
use std::cell::RefCell;
use std::collections::HashMap;
use zotnotes_core::{
    Collection, Group, Item, LibraryError, LibraryResult, LibrarySource,
};

pub const ANNOTATION_BODY: &str =
    "<p><strong>Extracted Annotations (2024-01-02)</strong></p><p>\"Quote\" (<a href=\"zotero://open-pdf/library/items/PDF1?page=3\">Smith 2019:3</a>)</p>";

/// In-memory library keyed the same way the Web API is.
#[derive(Default)]
pub struct FixtureLibrary {
    collections: Vec<Collection>,
    library_items: Vec<Item>,
    collection_items: HashMap<String, Vec<Item>>,
    items: HashMap<String, Item>,
    children: HashMap<String, Vec<Item>>,
    search_hits: HashMap<String, Vec<Item>>,
    groups: Vec<Group>,
    pub item_requests: RefCell<Vec<String>>,
}

impl FixtureLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, key: &str, name: &str, parent: Option<&str>) -> Self {
        self.collections.push(Collection::new(key, name, parent));
        self
    }

    /// Registers a fetchable item without placing it anywhere.
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.insert(item.key.clone(), item);
        self
    }

    /// Places items in a collection listing; documents also become fetchable.
    pub fn with_collection_items(mut self, collection_key: &str, items: Vec<Item>) -> Self {
        for item in &items {
            self.items.insert(item.key.clone(), item.clone());
        }
        self.collection_items
            .entry(collection_key.to_string())
            .or_default()
            .extend(items);
        self
    }

    /// Appends items to the whole-library listing; they also become fetchable.
    pub fn with_library_items(mut self, items: Vec<Item>) -> Self {
        for item in &items {
            self.items.insert(item.key.clone(), item.clone());
        }
        self.library_items.extend(items);
        self
    }

    pub fn with_children(mut self, parent_key: &str, children: Vec<Item>) -> Self {
        self.children
            .entry(parent_key.to_string())
            .or_default()
            .extend(children);
        self
    }

    pub fn with_search_hits(mut self, query: &str, hits: Vec<Item>) -> Self {
        for hit in &hits {
            self.items.insert(hit.key.clone(), hit.clone());
        }
        self.search_hits.insert(query.to_string(), hits);
        self
    }

    pub fn with_group(mut self, id: u64, name: &str) -> Self {
        let group: Group = serde_json::from_value(json!({"id": id, "data": {"id": id, "name": name}}))
            .expect("group fixture should decode");
        self.groups.push(group);
        self
    }
}

impl LibrarySource for FixtureLibrary {
    fn collections(&self) -> LibraryResult<Vec<Collection>> {
        Ok(self.collections.clone())
    }

    fn items(&self) -> LibraryResult<Vec<Item>> {
        Ok(self.library_items.clone())
    }

    fn collection_items(&self, collection_key: &str) -> LibraryResult<Vec<Item>> {
        Ok(self
            .collection_items
            .get(collection_key)
            .cloned()
            .unwrap_or_default())
    }

    fn search_top_items(&self, query: &str) -> LibraryResult<Vec<Item>> {
        Ok(self.search_hits.get(query).cloned().unwrap_or_default())
    }

    fn children(&self, item_key: &str) -> LibraryResult<Vec<Item>> {
        Ok(self.children.get(item_key).cloned().unwrap_or_default())
    }

    fn item(&self, item_key: &str) -> LibraryResult<Item> {
        self.item_requests.borrow_mut().push(item_key.to_string());
        self.items
            .get(item_key)
            .cloned()
            .ok_or_else(|| LibraryError::NotFound(item_key.to_string()))
    }

    fn groups(&self) -> LibraryResult<Vec<Group>> {
        Ok(self.groups.clone())
    }
}

pub fn document(
    key: &str,
    title: &str,
    date: &str,
    collections: &[&str],
    creators: Option<&str>,
) -> Item {
    let mut value = json!({
        "key": key,
        "version": 1,
        "data": {
            "key": key,
            "itemType": "journalArticle",
            "title": title,
            "date": date,
            "collections": collections,
        },
        "meta": {},
    });
    if let Some(creators) = creators {
        value["meta"]["creatorSummary"] = json!(creators);
    }
    serde_json::from_value(value).expect("document fixture should decode")
}

pub fn note(key: &str, parent: &str, body: &str) -> Item {
    serde_json::from_value(json!({
        "key": key,
        "data": {
            "key": key,
            "itemType": "note",
            "parentItem": parent,
            "note": body,
            "collections": [],
        },
    }))
    .expect("note fixture should decode")
}

pub fn attachment(key: &str, parent: &str) -> Item {
    serde_json::from_value(json!({
        "key": key,
        "data": {
            "key": key,
            "itemType": "attachment",
            "parentItem": parent,
            "title": "Full Text PDF",
        },
    }))
    .expect("attachment fixture should decode")
}

/// Note-bearing item with an arbitrary item type.
pub fn typed_item(key: &str, item_type: &str, parent: &str, body: &str) -> Item {
    serde_json::from_value(json!({
        "key": key,
        "data": {
            "key": key,
            "itemType": item_type,
            "parentItem": parent,
            "note": body,
        },
    }))
    .expect("typed item fixture should decode")
}

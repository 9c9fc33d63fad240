//! Remote library access contracts.
//!
//! # Responsibility
//! - Define the read-only operations the note pipeline needs from a
//!   reference library (`LibrarySource`).
//! - Keep HTTP, pagination and auth details inside the client boundary.
//!
//! # Invariants
//! - List operations return every page, in server order.
//! - Sources never mutate the remote library.

pub mod zotero;

use crate::model::collection::Collection;
use crate::model::item::{Group, Item};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LibraryResult<T> = Result<T, LibraryError>;

/// Errors from remote library access.
#[derive(Debug)]
pub enum LibraryError {
    /// Client configuration is unusable (missing key, bad base URL, ...).
    InvalidConfig(String),
    /// Transport-level HTTP failure.
    Http(reqwest::Error),
    /// Server answered with a non-success status.
    Status { status: u16, url: String, body: String },
    /// Response body is not the expected JSON shape.
    Decode { url: String, source: serde_json::Error },
    /// Requested item does not exist.
    NotFound(String),
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(message) => write!(f, "invalid library config: {message}"),
            Self::Http(err) => write!(f, "library request failed: {err}"),
            Self::Status { status, url, body } => {
                write!(f, "library request `{url}` returned HTTP {status}: {body}")
            }
            Self::Decode { url, source } => {
                write!(f, "library response from `{url}` is not valid: {source}")
            }
            Self::NotFound(key) => write!(f, "library item not found: {key}"),
        }
    }
}

impl Error for LibraryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LibraryError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Read-only view of one reference library.
pub trait LibrarySource {
    /// Lists every collection of the library.
    fn collections(&self) -> LibraryResult<Vec<Collection>>;
    /// Lists every item of the library, child notes included.
    fn items(&self) -> LibraryResult<Vec<Item>>;
    /// Lists every item in one collection, child notes included.
    fn collection_items(&self, collection_key: &str) -> LibraryResult<Vec<Item>>;
    /// Lists top-level items matching `query` across all fields.
    fn search_top_items(&self, query: &str) -> LibraryResult<Vec<Item>>;
    /// Lists child items (notes, attachments) of one item.
    fn children(&self, item_key: &str) -> LibraryResult<Vec<Item>>;
    /// Loads one item by key.
    fn item(&self, item_key: &str) -> LibraryResult<Item>;
    /// Lists groups visible to the authenticated user.
    fn groups(&self) -> LibraryResult<Vec<Group>>;
}

impl<T: LibrarySource + ?Sized> LibrarySource for &T {
    fn collections(&self) -> LibraryResult<Vec<Collection>> {
        (**self).collections()
    }

    fn items(&self) -> LibraryResult<Vec<Item>> {
        (**self).items()
    }

    fn collection_items(&self, collection_key: &str) -> LibraryResult<Vec<Item>> {
        (**self).collection_items(collection_key)
    }

    fn search_top_items(&self, query: &str) -> LibraryResult<Vec<Item>> {
        (**self).search_top_items(query)
    }

    fn children(&self, item_key: &str) -> LibraryResult<Vec<Item>> {
        (**self).children(item_key)
    }

    fn item(&self, item_key: &str) -> LibraryResult<Item> {
        (**self).item(item_key)
    }

    fn groups(&self) -> LibraryResult<Vec<Group>> {
        (**self).groups()
    }
}

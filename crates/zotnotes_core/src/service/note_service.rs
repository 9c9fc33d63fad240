//! Annotation note selection use-case service.
//!
//! # Responsibility
//! - Resolve the target item set by collection name, free-text search, or
//!   the whole library.
//! - Select extracted-annotation notes and join them with their parent
//!   document and collection breadcrumb.
//!
//! # Invariants
//! - Attachments and placeholder notes never reach record resolution.
//! - A note whose parent cannot be loaded is skipped, never fatal.
//! - Records keep the order in which the library returned the notes.

use crate::library::{LibraryError, LibrarySource};
use crate::model::collection::CollectionIndex;
use crate::model::item::Item;
use crate::model::note::NoteRecord;
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Content prefixes written by annotation extractors.
pub const ANNOTATION_PREFIXES: &[&str] = &[
    "<p><strong>Extracted Annotations",
    "<p><b>Extracted Annotations",
];
/// Content prefix of import placeholder notes.
pub const PLACEHOLDER_PREFIX: &str = "The following values";

pub const DEFAULT_BREADCRUMB: &str = "None";
pub const DEFAULT_TITLE: &str = "No Title";
pub const DEFAULT_CREATORS: &str = "No Author";
pub const DEFAULT_DATE: &str = "N.d.";

static DIGIT_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("valid digit run regex"));

/// Service error for note collection use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// The library has no collections at all.
    NoCollections,
    /// No collection carries the requested name.
    CollectionNotFound(String),
    /// Remote library failure.
    Library(LibraryError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCollections => write!(f, "library has no collections"),
            Self::CollectionNotFound(name) => write!(f, "collection not found: `{name}`"),
            Self::Library(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Library(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LibraryError> for NoteServiceError {
    fn from(value: LibraryError) -> Self {
        Self::Library(value)
    }
}

/// Outcome of one note collection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesReport {
    /// Candidate note items inspected after attachment/placeholder filtering.
    pub scanned_notes: usize,
    /// Resolved annotation records in library order.
    pub records: Vec<NoteRecord>,
}

/// Note pipeline facade over a library source.
pub struct NoteService<S: LibrarySource> {
    source: S,
    index: CollectionIndex,
}

impl<S: LibrarySource> NoteService<S> {
    /// Creates a service over an already loaded collection index.
    pub fn new(source: S, index: CollectionIndex) -> Self {
        Self { source, index }
    }

    /// Fetches all collections and builds the service.
    pub fn load(source: S) -> Result<Self, NoteServiceError> {
        let collections = source.collections()?;
        info!(
            "event=collections_loaded module=notes status=ok count={}",
            collections.len()
        );
        Ok(Self::new(source, CollectionIndex::new(collections)))
    }

    pub fn index(&self) -> &CollectionIndex {
        &self.index
    }

    /// Collects annotation records from the collection named `name`.
    ///
    /// # Errors
    /// - `NoCollections` when the library has no collections.
    /// - `CollectionNotFound` when no collection is named exactly `name`.
    pub fn collect_collection_notes(&self, name: &str) -> Result<NotesReport, NoteServiceError> {
        if self.index.is_empty() {
            return Err(NoteServiceError::NoCollections);
        }
        let key = self
            .index
            .find_key_by_name(name)
            .ok_or_else(|| NoteServiceError::CollectionNotFound(name.to_string()))?;
        debug!("event=collection_resolved module=notes status=ok key={key}");

        let items = self.source.collection_items(key)?;
        let candidates: Vec<Item> = items
            .into_iter()
            .filter(|item| !item.is_attachment())
            .filter(is_candidate_note)
            .collect();
        Ok(self.resolve_all(&candidates))
    }

    /// Collects annotation records attached to top-level search hits.
    pub fn collect_search_notes(&self, query: &str) -> Result<NotesReport, NoteServiceError> {
        let hits = self.source.search_top_items(query)?;
        debug!(
            "event=search_completed module=notes status=ok hits={}",
            hits.len()
        );

        let mut candidates = Vec::new();
        for hit in hits.iter().filter(|item| !item.is_attachment()) {
            let children = self.source.children(&hit.key)?;
            candidates.extend(children.into_iter().filter(is_candidate_note));
        }
        Ok(self.resolve_all(&candidates))
    }

    /// Collects annotation records from every item of the library.
    pub fn collect_library_notes(&self) -> Result<NotesReport, NoteServiceError> {
        let items = self.source.items()?;
        debug!(
            "event=library_listed module=notes status=ok items={}",
            items.len()
        );

        let candidates: Vec<Item> = items
            .into_iter()
            .filter(|item| !item.is_attachment())
            .filter(is_candidate_note)
            .collect();
        Ok(self.resolve_all(&candidates))
    }

    /// Joins one note with its parent document.
    ///
    /// Returns `None` when the note is not an extracted annotation or its
    /// parent cannot be loaded.
    pub fn resolve_note(&self, note: &Item) -> Option<NoteRecord> {
        if !is_extracted_annotation(note) {
            return None;
        }

        let Some(parent_key) = note.data.parent_item.as_deref() else {
            error!(
                "event=note_skipped module=notes status=error note={} reason=missing_parent",
                note.key
            );
            return None;
        };
        let parent = match self.source.item(parent_key) {
            Ok(parent) => parent,
            Err(err) => {
                error!(
                    "event=note_skipped module=notes status=error note={} parent={} error={}",
                    note.key, parent_key, err
                );
                return None;
            }
        };

        let breadcrumb = parent
            .data
            .collections
            .first()
            .and_then(|key| self.index.breadcrumb(key))
            .unwrap_or_else(|| {
                warn!(
                    "event=breadcrumb_default module=notes status=warn parent={}",
                    parent.key
                );
                DEFAULT_BREADCRUMB.to_string()
            });

        Some(NoteRecord {
            breadcrumb,
            title: non_blank_or(parent.data.title.as_deref(), DEFAULT_TITLE),
            date: parent
                .data
                .date
                .as_deref()
                .and_then(extract_year)
                .unwrap_or(DEFAULT_DATE)
                .to_string(),
            creators: non_blank_or(parent.meta.creator_summary.as_deref(), DEFAULT_CREATORS),
            body: note.note_body().to_string(),
        })
    }

    fn resolve_all(&self, candidates: &[Item]) -> NotesReport {
        let records: Vec<NoteRecord> = candidates
            .iter()
            .filter_map(|note| self.resolve_note(note))
            .collect();
        info!(
            "event=notes_resolved module=notes status=ok scanned={} records={}",
            candidates.len(),
            records.len()
        );
        NotesReport {
            scanned_notes: candidates.len(),
            records,
        }
    }
}

/// Returns whether the note body starts with an extractor heading.
pub fn is_extracted_annotation(note: &Item) -> bool {
    let body = note.note_body();
    ANNOTATION_PREFIXES
        .iter()
        .any(|prefix| body.starts_with(prefix))
}

/// Returns whether the note is an import placeholder.
pub fn is_placeholder_note(note: &Item) -> bool {
    note.note_body().starts_with(PLACEHOLDER_PREFIX)
}

/// Note item that is not an import placeholder.
pub fn is_candidate_note(item: &Item) -> bool {
    item.is_note() && !is_placeholder_note(item)
}

/// Returns the first standalone run of 4 to 20 Unicode decimal digits.
///
/// Runs adjacent to further digits are not standalone, so longer runs are
/// skipped entirely rather than split. Length counts digits, not bytes.
pub fn extract_year(date: &str) -> Option<&str> {
    DIGIT_RUN_RE
        .find_iter(date)
        .map(|run| run.as_str())
        .find(|run| (4..=20).contains(&run.chars().count()))
}

fn non_blank_or(value: Option<&str>, default: &str) -> String {
    value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(default)
        .to_string()
}

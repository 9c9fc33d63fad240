//! Core logic for ZotNotes.
//! Fetches annotation notes from a Zotero library and renders them as RTF.

pub mod config;
pub mod library;
pub mod logging;
pub mod model;
pub mod render;
pub mod service;

pub use config::{AppConfig, ConfigError, LibraryConfig, LibraryKind};
pub use library::zotero::ZoteroClient;
pub use library::{LibraryError, LibraryResult, LibrarySource};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::collection::{Collection, CollectionIndex, CollectionKey, CollectionNode};
pub use model::item::{Group, Item, ItemData, ItemKey, ItemMeta};
pub use model::note::NoteRecord;
pub use render::export::{write_document, ExportError, ExportReport};
pub use render::rtf::render_body;
pub use service::collection_service::{CollectionNoteCount, CollectionService};
pub use service::note_service::{NoteService, NoteServiceError, NotesReport};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

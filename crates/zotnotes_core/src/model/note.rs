//! Resolved annotation record.

/// One extracted-annotation note joined with its parent document.
///
/// Every field is already defaulted; rendering never has to branch on
/// missing metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    /// `Parent/Child` collection path of the parent document.
    pub breadcrumb: String,
    pub title: String,
    /// Publication year or `N.d.`.
    pub date: String,
    /// Author summary as computed by the server.
    pub creators: String,
    /// Raw HTML note body.
    pub body: String,
}

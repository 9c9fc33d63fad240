//! RTF rendering and file export.
//!
//! # Responsibility
//! - Turn resolved note records into one RTF document body.
//! - Write the wrapped document to a dated file with pre/post checks.
//!
//! # Invariants
//! - HTML-to-RTF rewriting is a fixed, ordered literal substitution list;
//!   no markup is parsed.

pub mod export;
pub mod rtf;

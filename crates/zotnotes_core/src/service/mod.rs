//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate library source calls into use-case level APIs.
//! - Keep CLI glue decoupled from HTTP and wire-format details.

pub mod collection_service;
pub mod note_service;

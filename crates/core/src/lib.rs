//! Domain types for the journal service.
//!
//! Holds the entry model, the analysis result shape, and the shared error
//! types. This crate performs no I/O so it can be used by the store, the
//! analysis pipeline, and the HTTP layer alike.

pub mod analysis;
pub mod entry;
pub mod error;
pub mod types;

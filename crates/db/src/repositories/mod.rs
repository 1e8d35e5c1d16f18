//! Repository layer.
//!
//! Each repository is a zero-sized struct with async methods that take a
//! `&DbPool` as their first argument.

pub mod entry_repo;

pub use entry_repo::EntryRepo;

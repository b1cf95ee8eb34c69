//! Storage abstraction and implementations for OKR records.
//!
//! This crate provides a trait-based storage interface with an in-memory
//! reference implementation that can be seeded from a JSON snapshot.

#![warn(missing_docs)]

pub mod trait_;
pub mod snapshot;
pub mod memory_storage;

pub use trait_::{Storage, StorageError, Result};
pub use snapshot::Snapshot;
pub use memory_storage::MemoryStorage;

//! Ordered key-value storage for xhub.
//!
//! This crate is the thin contract between the resource layer and the
//! embedded storage engine: put, get, delete, and ordered prefix scans over
//! raw byte keys.
//!
//! # Storage Backends
//!
//! All backends implement the [`OrderedStore`] trait:
//!
//! - [`InMemoryOrderedStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`SqlitePartition`] -- a named table inside a [`SqliteEngine`] database file
//!
//! # Design Rules
//!
//! 1. Keys are ordered bytewise; scans return entries in key order.
//! 2. A prefix scan returns only true byte-prefix matches.
//! 3. Overwrite and delete-of-absent are not errors.
//! 4. The store never interprets keys or values.
//! 5. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod traits;

#[cfg(test)]
mod testing;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryOrderedStore;
pub use sqlite::{SqliteEngine, SqlitePartition};
pub use traits::{Entry, OrderedStore};

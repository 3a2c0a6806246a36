//! Key codec for xhub.
//!
//! Maps the tree-shaped resource model onto the flat, lexicographically
//! ordered keyspace of the storage engine. See [`KeyCodec`] for the key
//! layout and the prefix-purity rules it maintains.

pub mod codec;
pub mod error;

pub use codec::{KeyCodec, KeyPrefix, StoredKey, FILES, STUDIES, TRIALS};
pub use error::{KeyError, KeyResult};

//! Study index for xhub.
//!
//! Keeps the authoritative list of top-level resources (studies) with their
//! creation times in a partition of its own, so listing studies costs one
//! pass over the studies rather than a scan of everything nested under them.
//!
//! # Key Types
//!
//! - [`ResourceIndex`] -- The registry over an [`xhub_store::OrderedStore`]
//! - [`IndexEntry`] -- A recorded key with its creation time

pub mod error;
pub mod index;

pub use error::{IndexError, IndexResult};
pub use index::{IndexEntry, ResourceIndex};

//! Hierarchical resource store for xhub.
//!
//! Studies, trials, and files live in one ordered key-value partition,
//! addressed by the keys [`xhub_keys::KeyCodec`] produces. Studies are
//! additionally tracked in a [`xhub_index::ResourceIndex`] that records when
//! each was created and drives study listings.
//!
//! ```text
//! /studies/{study}
//! /studies/{study}/trials/{trial}
//! /studies/{study}/files/{file}
//! /files/{study}/{trial}/{file}
//! ```
//!
//! Deleting a study removes its trials, its study files, and the files of
//! every trial. Deleting a trial removes its files.

pub mod clock;
pub mod collection;
pub mod error;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use collection::{Collection, CollectionAssembler, CollectionItem, RawItem, API_VERSION};
pub use error::{AssemblyError, ResourceError, ResourceResult};
pub use store::{DeleteReport, Resource, ResourceStore};

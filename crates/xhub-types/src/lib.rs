//! Foundation types for xhub.
//!
//! xhub stores metadata for a three-level experimental-resource hierarchy:
//! studies contain trials and study-level files, and trials contain
//! trial-level files.
//!
//! # Modules
//!
//! - [`error`] -- Error types for path construction
//! - [`names`] -- Segment name validation and [`SegmentName`]
//! - [`path`] -- [`ResourceKind`], [`ResourcePath`], and [`Scope`]

pub mod error;
pub mod names;
pub mod path;

pub use error::{PathError, PathResult};
pub use names::{validate_segment, SegmentName, DELIMITER, URL_UNSAFE};
pub use path::{ResourceKind, ResourcePath, Scope};

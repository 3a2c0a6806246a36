//! Segment name validation.
//!
//! A segment is one variable component of a resource path: a study, trial,
//! or file name. Valid segment names:
//! - Must be non-empty
//! - Must not contain the path delimiter `/`
//! - Must not be `.` or `..` (URL clients collapse these before routing)
//! - Must consist of printable ASCII: no control characters, whitespace,
//!   or non-ASCII text
//! - Must not contain characters a URL path cannot carry unescaped
//!   (`?`, `#`, `%`, and the like)
//!
//! Rejecting the delimiter is what keeps every stored key unambiguous: a
//! name can never smuggle in an extra level of hierarchy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PathError, PathResult};

/// The delimiter separating path segments in keys and URLs.
pub const DELIMITER: char = '/';

/// Characters that end or escape a URL path, or may not appear in one raw.
///
/// A stored key doubles as the path of the resource's URL, so every name
/// must survive being pasted into one verbatim.
pub const URL_UNSAFE: &[char] = &['?', '#', '%', '\\', '"', '<', '>', '^', '`', '{', '}', '|'];

/// Validate a segment name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use xhub_types::names::validate_segment;
///
/// assert!(validate_segment("study_a").is_ok());
/// assert!(validate_segment("trial-01.v2").is_ok());
/// assert!(validate_segment("").is_err());
/// assert!(validate_segment("a/b").is_err());
/// assert!(validate_segment("q?x").is_err());
/// ```
pub fn validate_segment(name: &str) -> PathResult<()> {
    if name.is_empty() {
        return Err(PathError::InvalidPathSegment {
            segment: name.to_string(),
            reason: "segment name must not be empty".into(),
        });
    }

    if name.contains(DELIMITER) {
        return Err(PathError::InvalidPathSegment {
            segment: name.to_string(),
            reason: format!("must not contain the delimiter {DELIMITER:?}"),
        });
    }

    if let Some(c) = name.chars().find(|c| !c.is_ascii_graphic()) {
        return Err(PathError::InvalidPathSegment {
            segment: name.to_string(),
            reason: format!("must contain only printable ASCII, found {c:?}"),
        });
    }

    if let Some(c) = name.chars().find(|c| URL_UNSAFE.contains(c)) {
        return Err(PathError::InvalidPathSegment {
            segment: name.to_string(),
            reason: format!("must not contain URL-unsafe character {c:?}"),
        });
    }

    if name == "." || name == ".." {
        return Err(PathError::InvalidPathSegment {
            segment: name.to_string(),
            reason: "must not be a relative path component".into(),
        });
    }

    Ok(())
}

/// A validated path segment name.
///
/// Construction goes through [`validate_segment`], so holding a
/// `SegmentName` is proof that the name is safe to embed in a key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SegmentName(String);

impl SegmentName {
    /// Validate and wrap a segment name.
    pub fn new(name: impl Into<String>) -> PathResult<Self> {
        let name = name.into();
        validate_segment(&name)?;
        Ok(Self(name))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SegmentName {
    type Error = PathError;

    fn try_from(value: String) -> PathResult<Self> {
        Self::new(value)
    }
}

impl FromStr for SegmentName {
    type Err = PathError;

    fn from_str(s: &str) -> PathResult<Self> {
        Self::new(s)
    }
}

impl From<SegmentName> for String {
    fn from(name: SegmentName) -> Self {
        name.0
    }
}

impl AsRef<str> for SegmentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SegmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

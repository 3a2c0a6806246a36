//! The [`KeyCodec`]: resource paths to stored keys and back.
//!
//! Keys are slash-delimited and mirror the URL layout, so a key doubles as
//! the resource's canonical identifier:
//!
//! ```text
//! Study              /studies/{study}
//! Trial              /studies/{study}/trials/{trial}
//! Study-level file   /studies/{study}/files/{file}
//! Trial-level file   /files/{study}/{trial}/{file}
//! ```
//!
//! Segment names never contain `/`, and every prefix handed out for a scan
//! ends in `/`. Together these guarantee prefix purity: study `a` never
//! matches the keys of study `ab`.

use std::fmt;

use xhub_types::{ResourcePath, Scope, SegmentName, DELIMITER};

use crate::error::{KeyError, KeyResult};

/// Literal segment introducing the study namespace.
pub const STUDIES: &str = "studies";
/// Literal segment introducing a study's trials.
pub const TRIALS: &str = "trials";
/// Literal segment introducing study-level files, and the root of the
/// trial-level file namespace.
pub const FILES: &str = "files";

/// A key under which a resource's payload is stored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoredKey(String);

impl StoredKey {
    /// The key as text (keys are always valid UTF-8).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key as raw bytes for the ordered store.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Returns `true` if this key lies under `prefix`.
    pub fn has_prefix(&self, prefix: &KeyPrefix) -> bool {
        self.0.starts_with(prefix.as_str())
    }
}

impl AsRef<[u8]> for StoredKey {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<StoredKey> for String {
    fn from(key: StoredKey) -> Self {
        key.0
    }
}

impl fmt::Display for StoredKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A byte prefix for range scans. Always ends in the delimiter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPrefix(String);

impl KeyPrefix {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl AsRef<[u8]> for KeyPrefix {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deterministic, injective mapping between [`ResourcePath`]s and
/// [`StoredKey`]s.
///
/// The codec is stateless; it exists as a type so callers can hold it
/// alongside the store handles it is used with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyCodec;

impl KeyCodec {
    pub fn new() -> Self {
        Self
    }

    /// Encode a path into its stored key.
    pub fn encode(&self, path: &ResourcePath) -> StoredKey {
        let key = match path {
            ResourcePath::Study { study } => join(&[STUDIES, study.as_str()]),
            ResourcePath::Trial { study, trial } => {
                join(&[STUDIES, study.as_str(), TRIALS, trial.as_str()])
            }
            ResourcePath::StudyFile { study, file } => {
                join(&[STUDIES, study.as_str(), FILES, file.as_str()])
            }
            ResourcePath::TrialFile { study, trial, file } => {
                join(&[FILES, study.as_str(), trial.as_str(), file.as_str()])
            }
        };
        StoredKey(key)
    }

    /// Decode stored key bytes back into a path.
    ///
    /// Fails with [`KeyError::Malformed`] if the bytes are not UTF-8 or do
    /// not match one of the four shapes, and with [`KeyError::Path`] if a
    /// segment is not a valid name.
    pub fn decode(&self, key: &[u8]) -> KeyResult<ResourcePath> {
        let text = std::str::from_utf8(key).map_err(|_| KeyError::Malformed {
            key: String::from_utf8_lossy(key).into_owned(),
            reason: "not valid UTF-8".into(),
        })?;

        let rest = text
            .strip_prefix(DELIMITER)
            .ok_or_else(|| malformed(text, "missing leading delimiter"))?;
        let parts: Vec<&str> = rest.split(DELIMITER).collect();

        let path = match parts.as_slice() {
            [STUDIES, study] => ResourcePath::Study {
                study: SegmentName::new(*study)?,
            },
            [STUDIES, study, TRIALS, trial] => ResourcePath::Trial {
                study: SegmentName::new(*study)?,
                trial: SegmentName::new(*trial)?,
            },
            [STUDIES, study, FILES, file] => ResourcePath::StudyFile {
                study: SegmentName::new(*study)?,
                file: SegmentName::new(*file)?,
            },
            [FILES, study, trial, file] => ResourcePath::TrialFile {
                study: SegmentName::new(*study)?,
                trial: SegmentName::new(*trial)?,
                file: SegmentName::new(*file)?,
            },
            _ => return Err(malformed(text, "does not match any resource shape")),
        };
        Ok(path)
    }

    /// The prefix shared by every member key of a collection.
    ///
    /// For [`Scope::Studies`] the prefix also covers nested trials and
    /// study-level files; studies are listed through the index instead of
    /// a scan. For every other scope the prefix matches members only.
    pub fn prefix_for(&self, scope: &Scope) -> KeyPrefix {
        let prefix = match scope {
            Scope::Studies => join_prefix(&[STUDIES]),
            Scope::Trials { study } => join_prefix(&[STUDIES, study.as_str(), TRIALS]),
            Scope::StudyFiles { study } => join_prefix(&[STUDIES, study.as_str(), FILES]),
            Scope::TrialFiles { study, trial } => {
                join_prefix(&[FILES, study.as_str(), trial.as_str()])
            }
        };
        KeyPrefix(prefix)
    }

    /// Prefixes covering every transitive descendant of `path`.
    ///
    /// A study's descendants live under two roots: its own namespace
    /// (trials, study-level files) and the trial-level file namespace. A
    /// trial's descendants are its files. Files have none.
    pub fn descendant_prefixes(&self, path: &ResourcePath) -> Vec<KeyPrefix> {
        match path {
            ResourcePath::Study { study } => vec![
                KeyPrefix(join_prefix(&[STUDIES, study.as_str()])),
                KeyPrefix(join_prefix(&[FILES, study.as_str()])),
            ],
            ResourcePath::Trial { study, trial } => vec![KeyPrefix(join_prefix(&[
                FILES,
                study.as_str(),
                trial.as_str(),
            ]))],
            ResourcePath::StudyFile { .. } | ResourcePath::TrialFile { .. } => Vec::new(),
        }
    }
}

fn join(parts: &[&str]) -> String {
    let mut key = String::new();
    for part in parts {
        key.push(DELIMITER);
        key.push_str(part);
    }
    key
}

fn join_prefix(parts: &[&str]) -> String {
    let mut prefix = join(parts);
    prefix.push(DELIMITER);
    prefix
}

fn malformed(key: &str, reason: &str) -> KeyError {
    KeyError::Malformed {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

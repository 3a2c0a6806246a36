//! Resource kinds, resource paths, and collection scopes.
//!
//! The hierarchy has exactly four shapes:
//!
//! ```text
//! Study(S)
//! Study(S) -> Trial(T)
//! Study(S) -> File(F)              study-level file
//! Study(S) -> Trial(T) -> File(F)  trial-level file
//! ```
//!
//! [`ResourcePath`] is a closed enum over those shapes, so a path with any
//! other nesting cannot be constructed. [`Scope`] names the parent of a
//! collection (the thing a list or create call is addressed to).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PathError, PathResult};
use crate::names::SegmentName;

/// The kind of an experimental resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Top-level unit of organization.
    Study,
    /// An experimental trial within a study.
    Trial,
    /// A file attached to a study or to a trial.
    File,
}

impl ResourceKind {
    /// Lowercase label used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Study => "study",
            Self::Trial => "trial",
            Self::File => "file",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = PathError;

    fn from_str(s: &str) -> PathResult<Self> {
        match s {
            "study" => Ok(Self::Study),
            "trial" => Ok(Self::Trial),
            "file" => Ok(Self::File),
            other => Err(PathError::UnknownKind(other.to_string())),
        }
    }
}

/// The logical identity of a resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ResourcePath {
    Study {
        study: SegmentName,
    },
    Trial {
        study: SegmentName,
        trial: SegmentName,
    },
    StudyFile {
        study: SegmentName,
        file: SegmentName,
    },
    TrialFile {
        study: SegmentName,
        trial: SegmentName,
        file: SegmentName,
    },
}

impl ResourcePath {
    /// Path of a study.
    pub fn study(study: &str) -> PathResult<Self> {
        Ok(Self::Study {
            study: SegmentName::new(study)?,
        })
    }

    /// Path of a trial within a study.
    pub fn trial(study: &str, trial: &str) -> PathResult<Self> {
        Ok(Self::Trial {
            study: SegmentName::new(study)?,
            trial: SegmentName::new(trial)?,
        })
    }

    /// Path of a study-level file.
    pub fn study_file(study: &str, file: &str) -> PathResult<Self> {
        Ok(Self::StudyFile {
            study: SegmentName::new(study)?,
            file: SegmentName::new(file)?,
        })
    }

    /// Path of a trial-level file.
    pub fn trial_file(study: &str, trial: &str, file: &str) -> PathResult<Self> {
        Ok(Self::TrialFile {
            study: SegmentName::new(study)?,
            trial: SegmentName::new(trial)?,
            file: SegmentName::new(file)?,
        })
    }

    /// The kind of the resource this path names.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Study { .. } => ResourceKind::Study,
            Self::Trial { .. } => ResourceKind::Trial,
            Self::StudyFile { .. } | Self::TrialFile { .. } => ResourceKind::File,
        }
    }

    /// The leaf segment (the resource's own name).
    pub fn name(&self) -> &SegmentName {
        match self {
            Self::Study { study } => study,
            Self::Trial { trial, .. } => trial,
            Self::StudyFile { file, .. } | Self::TrialFile { file, .. } => file,
        }
    }

    /// The study every path is rooted at.
    pub fn study_name(&self) -> &SegmentName {
        match self {
            Self::Study { study }
            | Self::Trial { study, .. }
            | Self::StudyFile { study, .. }
            | Self::TrialFile { study, .. } => study,
        }
    }

    /// The collection this resource is a member of.
    pub fn scope(&self) -> Scope {
        match self {
            Self::Study { .. } => Scope::Studies,
            Self::Trial { study, .. } => Scope::Trials {
                study: study.clone(),
            },
            Self::StudyFile { study, .. } => Scope::StudyFiles {
                study: study.clone(),
            },
            Self::TrialFile { study, trial, .. } => Scope::TrialFiles {
                study: study.clone(),
                trial: trial.clone(),
            },
        }
    }

    /// Ordered `(kind, name)` segments from the root study to the leaf.
    pub fn segments(&self) -> Vec<(ResourceKind, &SegmentName)> {
        match self {
            Self::Study { study } => vec![(ResourceKind::Study, study)],
            Self::Trial { study, trial } => {
                vec![(ResourceKind::Study, study), (ResourceKind::Trial, trial)]
            }
            Self::StudyFile { study, file } => {
                vec![(ResourceKind::Study, study), (ResourceKind::File, file)]
            }
            Self::TrialFile { study, trial, file } => vec![
                (ResourceKind::Study, study),
                (ResourceKind::Trial, trial),
                (ResourceKind::File, file),
            ],
        }
    }

    /// Returns `true` if `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &ResourcePath) -> bool {
        match (self, other) {
            (Self::Study { study }, Self::Trial { study: s, .. })
            | (Self::Study { study }, Self::StudyFile { study: s, .. })
            | (Self::Study { study }, Self::TrialFile { study: s, .. }) => study == s,
            (
                Self::Trial { study, trial },
                Self::TrialFile {
                    study: s, trial: t, ..
                },
            ) => study == s && trial == t,
            _ => false,
        }
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (kind, name) in self.segments() {
            if !first {
                f.write_str(" -> ")?;
            }
            first = false;
            write!(f, "{kind}({name})")?;
        }
        Ok(())
    }
}

/// The parent of a collection: what a list or create call is addressed to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Scope {
    /// All studies.
    Studies,
    /// Trials of one study.
    Trials { study: SegmentName },
    /// Study-level files of one study.
    StudyFiles { study: SegmentName },
    /// Files of one trial.
    TrialFiles {
        study: SegmentName,
        trial: SegmentName,
    },
}

impl Scope {
    /// Scope of a study's trials.
    pub fn trials(study: &str) -> PathResult<Self> {
        Ok(Self::Trials {
            study: SegmentName::new(study)?,
        })
    }

    /// Scope of a study's study-level files.
    pub fn study_files(study: &str) -> PathResult<Self> {
        Ok(Self::StudyFiles {
            study: SegmentName::new(study)?,
        })
    }

    /// Scope of a trial's files.
    pub fn trial_files(study: &str, trial: &str) -> PathResult<Self> {
        Ok(Self::TrialFiles {
            study: SegmentName::new(study)?,
            trial: SegmentName::new(trial)?,
        })
    }

    /// The kind of resource held in this collection.
    pub fn child_kind(&self) -> ResourceKind {
        match self {
            Self::Studies => ResourceKind::Study,
            Self::Trials { .. } => ResourceKind::Trial,
            Self::StudyFiles { .. } | Self::TrialFiles { .. } => ResourceKind::File,
        }
    }

    /// The path of the member named `name`.
    pub fn child(&self, name: SegmentName) -> ResourcePath {
        match self {
            Self::Studies => ResourcePath::Study { study: name },
            Self::Trials { study } => ResourcePath::Trial {
                study: study.clone(),
                trial: name,
            },
            Self::StudyFiles { study } => ResourcePath::StudyFile {
                study: study.clone(),
                file: name,
            },
            Self::TrialFiles { study, trial } => ResourcePath::TrialFile {
                study: study.clone(),
                trial: trial.clone(),
                file: name,
            },
        }
    }
}

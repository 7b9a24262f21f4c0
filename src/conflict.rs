//! Target-path conflict detection and resolution.
//!
//! A conflict exists when the path a transfer is about to write already
//! exists. The [`ConflictPolicy`] decides whether the transfer is skipped,
//! replaces the existing file, or is redirected to a numbered sibling
//! (`name_1.ext`, `name_2.ext`, ...).

use crate::paths;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Upper bound on numbered-sibling probes when no configuration overrides it.
pub const DEFAULT_MAX_RENAME_ATTEMPTS: usize = 10_000;

/// How to handle a target path that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Leave the existing file alone and skip the transfer.
    Skip,
    /// Replace the existing file.
    Overwrite,
    /// Write to the first free `stem_N.ext` sibling instead.
    #[default]
    Rename,
}

impl ConflictPolicy {
    /// Returns the lowercase name used on the wire and in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictPolicy::Skip => "skip",
            ConflictPolicy::Overwrite => "overwrite",
            ConflictPolicy::Rename => "rename",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(ConflictPolicy::Skip),
            "overwrite" => Ok(ConflictPolicy::Overwrite),
            "rename" => Ok(ConflictPolicy::Rename),
            other => Err(format!(
                "unknown conflict resolution '{}' (expected skip, overwrite or rename)",
                other
            )),
        }
    }
}

/// The decision taken for one candidate target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No conflict: write to the original path.
    Proceed(PathBuf),
    /// Conflict under [`ConflictPolicy::Skip`]: do not transfer.
    Skip,
    /// Conflict under [`ConflictPolicy::Overwrite`]: replace this path.
    Overwrite(PathBuf),
    /// Conflict under [`ConflictPolicy::Rename`]: write to this free sibling.
    Renamed(PathBuf),
}

impl Resolution {
    /// Returns true if the original target path was occupied.
    pub fn is_conflict(&self) -> bool {
        !matches!(self, Resolution::Proceed(_))
    }

    /// Returns the path to transfer to, or `None` when the transfer is skipped.
    pub fn target(&self) -> Option<&Path> {
        match self {
            Resolution::Proceed(path) | Resolution::Overwrite(path) | Resolution::Renamed(path) => {
                Some(path.as_path())
            }
            Resolution::Skip => None,
        }
    }
}

/// Errors that prevent a conflict from being resolved.
#[derive(Debug, thiserror::Error)]
pub enum ConflictError {
    /// The existence probe itself failed (for example, permission denied).
    #[error("Could not check whether {} exists: {source}", .path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Every numbered sibling up to the attempt limit is taken.
    #[error("No free name for {} after {attempts} attempts", .path.display())]
    RenameExhausted { path: PathBuf, attempts: usize },
}

/// Resolves target-path conflicts under a fixed policy.
#[derive(Debug, Clone, Copy)]
pub struct ConflictResolver {
    policy: ConflictPolicy,
    max_rename_attempts: usize,
}

impl ConflictResolver {
    /// Creates a resolver; `max_rename_attempts` bounds sibling probing.
    pub fn new(policy: ConflictPolicy, max_rename_attempts: usize) -> Self {
        Self {
            policy,
            max_rename_attempts,
        }
    }

    /// Decides what to do with `target`.
    ///
    /// A failed probe is an error, never an implicit "does not exist".
    /// Under [`ConflictPolicy::Rename`] the returned path did not exist when
    /// probed; nothing guards against another process creating it afterwards.
    pub fn resolve(&self, target: &Path) -> Result<Resolution, ConflictError> {
        if !exists(target)? {
            return Ok(Resolution::Proceed(target.to_path_buf()));
        }

        match self.policy {
            ConflictPolicy::Skip => Ok(Resolution::Skip),
            ConflictPolicy::Overwrite => Ok(Resolution::Overwrite(target.to_path_buf())),
            ConflictPolicy::Rename => self.free_sibling(target).map(Resolution::Renamed),
        }
    }

    fn free_sibling(&self, target: &Path) -> Result<PathBuf, ConflictError> {
        for n in 1..=self.max_rename_attempts {
            let candidate = paths::numbered_sibling(target, n);
            if !exists(&candidate)? {
                return Ok(candidate);
            }
        }
        Err(ConflictError::RenameExhausted {
            path: target.to_path_buf(),
            attempts: self.max_rename_attempts,
        })
    }
}

impl Default for ConflictResolver {
    fn default() -> Self {
        Self::new(ConflictPolicy::default(), DEFAULT_MAX_RENAME_ATTEMPTS)
    }
}

fn exists(path: &Path) -> Result<bool, ConflictError> {
    path.try_exists().map_err(|e| ConflictError::Probe {
        path: path.to_path_buf(),
        source: e,
    })
}

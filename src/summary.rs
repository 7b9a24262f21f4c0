//! Aggregate counters returned by the orchestrators.
//!
//! Every summary is a plain value. Recursive traversal returns one summary
//! per directory and the caller adds them together, so no counter is ever
//! shared between calls.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Add;
use std::path::{Path, PathBuf};

/// A per-entry failure kept alongside the error count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    #[serde(serialize_with = "serialize_lossy_path")]
    pub path: PathBuf,
    pub error: String,
}

impl Failure {
    pub fn new(path: &Path, error: impl fmt::Display) -> Self {
        Self {
            path: path.to_path_buf(),
            error: error.to_string(),
        }
    }
}

/// Serialises a path as a string, replacing invalid UTF-8.
pub(crate) fn serialize_lossy_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// Counters for one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Files copied or moved.
    pub processed: usize,
    /// Target collisions observed, however they were resolved.
    pub conflicts: usize,
    /// Per-entry failures (unreadable directories, failed transfers, ...).
    pub errors: usize,
    pub failures: Vec<Failure>,
}

impl ExtractSummary {
    pub fn transferred(conflict: bool) -> Self {
        Self {
            processed: 1,
            conflicts: usize::from(conflict),
            ..Self::default()
        }
    }

    pub fn skipped_conflict() -> Self {
        Self {
            conflicts: 1,
            ..Self::default()
        }
    }

    pub fn failed(failure: Failure, conflict: bool) -> Self {
        Self {
            conflicts: usize::from(conflict),
            errors: 1,
            failures: vec![failure],
            ..Self::default()
        }
    }
}

impl Add for ExtractSummary {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.processed += rhs.processed;
        self.conflicts += rhs.conflicts;
        self.errors += rhs.errors;
        self.failures.extend(rhs.failures);
        self
    }
}

/// Counters for one organize run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizeSummary {
    /// Regular files found at the top level of the source directory.
    pub total_files: usize,
    pub organized: usize,
    pub errors: usize,
    /// Files copied per category directory.
    pub categories: BTreeMap<String, usize>,
    pub failures: Vec<Failure>,
}

impl OrganizeSummary {
    pub fn organized(category: &str) -> Self {
        Self {
            organized: 1,
            categories: BTreeMap::from([(category.to_string(), 1)]),
            ..Self::default()
        }
    }

    pub fn failed(failure: Failure) -> Self {
        Self {
            errors: 1,
            failures: vec![failure],
            ..Self::default()
        }
    }
}

impl Add for OrganizeSummary {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.total_files += rhs.total_files;
        self.organized += rhs.organized;
        self.errors += rhs.errors;
        for (category, count) in rhs.categories {
            *self.categories.entry(category).or_insert(0) += count;
        }
        self.failures.extend(rhs.failures);
        self
    }
}

/// Returns at most `limit` failures for inclusion in a result payload.
pub fn bounded(failures: &[Failure], limit: usize) -> &[Failure] {
    &failures[..failures.len().min(limit)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_summaries_add_up() {
        let total = ExtractSummary::transferred(false)
            + ExtractSummary::transferred(true)
            + ExtractSummary::skipped_conflict()
            + ExtractSummary::failed(Failure::new(Path::new("x"), "boom"), false);

        assert_eq!(total.processed, 2);
        assert_eq!(total.conflicts, 2);
        assert_eq!(total.errors, 1);
        assert_eq!(total.failures[0].error, "boom");
    }

    #[test]
    fn test_organize_summaries_merge_categories() {
        let total = OrganizeSummary::organized("txt")
            + OrganizeSummary::organized("jpg")
            + OrganizeSummary::organized("txt");

        assert_eq!(total.organized, 3);
        assert_eq!(total.categories.get("txt"), Some(&2));
        assert_eq!(total.categories.get("jpg"), Some(&1));
    }

    #[test]
    fn test_bounded_failures() {
        let failures: Vec<_> = (0..5)
            .map(|i| Failure::new(Path::new("f"), i))
            .collect();
        assert_eq!(bounded(&failures, 3).len(), 3);
        assert_eq!(bounded(&failures, 10).len(), 5);
        assert!(bounded(&failures, 0).is_empty());
    }
}

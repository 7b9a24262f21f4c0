//! Read-only inventory of a directory tree.

use crate::error::{self, OperationResult};
use crate::pattern::GlobMatcher;
use crate::summary::{Failure, serialize_lossy_path};
use crate::walker::{DirectoryEntry, TreeWalker, Visitor};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::fs;
use std::io;
use std::ops::Add;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Metadata recorded for one listed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub name: String,
    /// Path relative to the listed directory.
    #[serde(serialize_with = "serialize_lossy_path")]
    pub path: PathBuf,
    pub size: u64,
    pub is_directory: bool,
    #[serde(serialize_with = "serialize_timestamp")]
    pub modified: DateTime<Utc>,
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Every record collected by a listing, plus entries that could not be read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub records: Vec<FileRecord>,
    pub errors: usize,
    pub failures: Vec<Failure>,
}

impl Add for Inventory {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.records.extend(rhs.records);
        self.errors += rhs.errors;
        self.failures.extend(rhs.failures);
        self
    }
}

/// The outcome of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListReport {
    pub directory: PathBuf,
    pub inventory: Inventory,
}

/// Lists directory entries whose names match a pattern.
pub struct Lister {
    pattern: Option<String>,
    recursive: bool,
}

impl Lister {
    pub fn new(pattern: Option<String>, recursive: bool) -> Self {
        Self { pattern, recursive }
    }

    /// Lists `directory`; directories are included when their name matches.
    pub fn run(&self, directory: &Path) -> OperationResult<ListReport> {
        error::require_directory(directory)?;
        let matcher = GlobMatcher::compile(self.pattern.as_deref())?;

        let inventory = TreeWalker::new(self.recursive).walk(directory, &ListVisitor { matcher });
        info!(
            "Listed {}: {} entries, {} errors",
            directory.display(),
            inventory.records.len(),
            inventory.errors
        );

        Ok(ListReport {
            directory: directory.to_path_buf(),
            inventory,
        })
    }
}

struct ListVisitor {
    matcher: GlobMatcher,
}

impl ListVisitor {
    fn record(&self, entry: &DirectoryEntry) -> Inventory {
        if !self.matcher.matches(&entry.name) {
            return Inventory::default();
        }

        match fs::metadata(&entry.full_path) {
            Ok(metadata) => {
                let modified = metadata
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .unwrap_or(DateTime::UNIX_EPOCH);
                Inventory {
                    records: vec![FileRecord {
                        name: entry.name.clone(),
                        path: entry.relative_path.clone(),
                        size: metadata.len(),
                        is_directory: entry.is_directory(),
                        modified,
                    }],
                    ..Inventory::default()
                }
            }
            Err(e) => {
                warn!("Error reading metadata of {}: {}", entry.full_path.display(), e);
                self.walk_failed(&entry.full_path, e)
            }
        }
    }
}

impl Visitor for ListVisitor {
    type Summary = Inventory;

    fn visit_file(&self, entry: &DirectoryEntry) -> Inventory {
        self.record(entry)
    }

    fn leave_dir(&self, entry: &DirectoryEntry) -> Inventory {
        self.record(entry)
    }

    fn visit_other(&self, entry: &DirectoryEntry) -> Inventory {
        self.record(entry)
    }

    fn walk_failed(&self, path: &Path, error: io::Error) -> Inventory {
        Inventory {
            errors: 1,
            failures: vec![Failure::new(path, error)],
            ..Inventory::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("docs")).unwrap();
        fs::write(root.join("a.txt"), "hello").unwrap();
        fs::write(root.join("b.md"), "#").unwrap();
        fs::write(root.join("docs").join("c.txt"), "nested").unwrap();
        temp_dir
    }

    fn names(report: &ListReport) -> BTreeSet<String> {
        report
            .inventory
            .records
            .iter()
            .map(|r| r.path.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_non_recursive_lists_immediate_entries() {
        let temp_dir = fixture();
        let report = Lister::new(None, false).run(temp_dir.path()).unwrap();

        assert_eq!(report.inventory.records.len(), 3);
        let docs = report
            .inventory
            .records
            .iter()
            .find(|r| r.name == "docs")
            .expect("Directory should be listed");
        assert!(docs.is_directory);
    }

    #[test]
    fn test_recursive_lists_nested_entries_with_relative_paths() {
        let temp_dir = fixture();
        let report = Lister::new(None, true).run(temp_dir.path()).unwrap();

        let expected: BTreeSet<String> = [
            "a.txt".to_string(),
            "b.md".to_string(),
            "docs".to_string(),
            Path::new("docs").join("c.txt").to_string_lossy().into_owned(),
        ]
        .into_iter()
        .collect();
        assert_eq!(names(&report), expected);
    }

    #[test]
    fn test_pattern_applies_to_directories_too() {
        let temp_dir = fixture();
        let report = Lister::new(Some("*.txt".to_string()), true)
            .run(temp_dir.path())
            .unwrap();

        let expected: BTreeSet<String> = [
            "a.txt".to_string(),
            Path::new("docs").join("c.txt").to_string_lossy().into_owned(),
        ]
        .into_iter()
        .collect();
        assert_eq!(names(&report), expected);

        let dirs_only = Lister::new(Some("do?s".to_string()), false)
            .run(temp_dir.path())
            .unwrap();
        assert_eq!(names(&dirs_only), BTreeSet::from(["docs".to_string()]));
    }

    #[test]
    fn test_record_carries_size() {
        let temp_dir = fixture();
        let report = Lister::new(Some("a.txt".to_string()), false)
            .run(temp_dir.path())
            .unwrap();
        assert_eq!(report.inventory.records[0].size, 5);
        assert!(!report.inventory.records[0].is_directory);
    }

    #[test]
    fn test_record_serialization() {
        let record = FileRecord {
            name: "a.txt".to_string(),
            path: PathBuf::from("a.txt"),
            size: 3,
            is_directory: false,
            modified: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["isDirectory"], false);
        assert_eq!(value["modified"], "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn test_file_is_not_a_valid_directory() {
        let temp_dir = fixture();
        assert!(Lister::new(None, false).run(&temp_dir.path().join("a.txt")).is_err());
    }
}

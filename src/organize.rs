//! Sort the files of one directory into category subdirectories.
//!
//! Only the immediate regular files of the source are considered. They are
//! collected before anything is copied, so category directories created
//! inside the source during the run are never picked up. Files are always
//! copied, and an existing file in the category directory is replaced.

use crate::category::{self, OrganizeBy};
use crate::error::{self, OperationResult};
use crate::summary::{Failure, OrganizeSummary};
use crate::transfer::{Transfer, TransferMode, TransferPlan};
use crate::walker::{DirectoryEntry, TreeWalker, Visitor};
use std::fs;
use std::io;
use std::ops::Add;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The outcome of a completed organize run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizeReport {
    pub source: PathBuf,
    pub target: PathBuf,
    pub criteria: OrganizeBy,
    pub summary: OrganizeSummary,
}

/// Organizes directories by one criterion.
pub struct Organizer {
    by: OrganizeBy,
}

impl Organizer {
    pub fn new(by: OrganizeBy) -> Self {
        Self { by }
    }

    /// Copies each file of `source` into `target/<category>/`.
    ///
    /// `target` defaults to `source`.
    pub fn run(&self, source: &Path, target: Option<&Path>) -> OperationResult<OrganizeReport> {
        let target = target.unwrap_or(source);
        error::require_directory(source)?;
        error::ensure_directory(target)?;

        info!(
            "Organizing {} into {} by {}",
            source.display(),
            target.display(),
            self.by
        );

        let scan = TreeWalker::new(false).walk(source, &FileScan);
        let mut summary = OrganizeSummary {
            total_files: scan.files.len(),
            errors: scan.failures.len(),
            failures: scan.failures,
            ..OrganizeSummary::default()
        };

        for entry in &scan.files {
            summary = summary + self.organize_file(entry, target);
        }

        info!(
            "Organize finished: {} of {} files organized, {} errors",
            summary.organized, summary.total_files, summary.errors
        );

        Ok(OrganizeReport {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            criteria: self.by,
            summary,
        })
    }

    fn organize_file(&self, entry: &DirectoryEntry, target: &Path) -> OrganizeSummary {
        let category = match fs::metadata(&entry.full_path)
            .and_then(|metadata| category::category_for(self.by, &entry.name, &metadata))
        {
            Ok(category) => category,
            Err(e) => return self.failed(entry, e),
        };

        let destination = target.join(&category).join(&entry.file_name);
        debug!("{} -> {}/", entry.name, category);
        match Transfer::execute(&TransferPlan::new(
            &entry.full_path,
            destination,
            TransferMode::Copy,
        )) {
            Ok(()) => OrganizeSummary::organized(&category),
            Err(e) => self.failed(entry, e),
        }
    }

    fn failed(&self, entry: &DirectoryEntry, error: impl std::fmt::Display) -> OrganizeSummary {
        warn!("Error organizing file {}: {}", entry.name, error);
        OrganizeSummary::failed(Failure::new(&entry.full_path, error))
    }
}

/// Regular files at the top level of a directory.
#[derive(Default)]
struct Scan {
    files: Vec<DirectoryEntry>,
    failures: Vec<Failure>,
}

impl Add for Scan {
    type Output = Scan;

    fn add(mut self, rhs: Scan) -> Scan {
        self.files.extend(rhs.files);
        self.failures.extend(rhs.failures);
        self
    }
}

struct FileScan;

impl Visitor for FileScan {
    type Summary = Scan;

    fn visit_file(&self, entry: &DirectoryEntry) -> Scan {
        Scan {
            files: vec![entry.clone()],
            ..Scan::default()
        }
    }

    fn walk_failed(&self, path: &Path, error: io::Error) -> Scan {
        Scan {
            failures: vec![Failure::new(path, error)],
            ..Scan::default()
        }
    }
}

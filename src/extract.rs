//! Bulk extraction: copy or move matching files from one tree into another.
//!
//! Each file found by the walk goes through three steps: the name is checked
//! against the pattern, the target path is checked for a conflict, and the
//! file is transferred. A failure at any step is counted and the walk moves
//! on to the next entry.

use crate::config::Settings;
use crate::conflict::{ConflictPolicy, ConflictResolver, Resolution};
use crate::error::{self, OperationResult};
use crate::paths;
use crate::pattern::GlobMatcher;
use crate::summary::{ExtractSummary, Failure};
use crate::transfer::{Transfer, TransferMode, TransferPlan};
use crate::walker::{DirectoryEntry, TreeWalker, Visitor};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Options for one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Glob applied to file names; `None` selects every file.
    pub pattern: Option<String>,
    pub recursive: bool,
    pub mode: TransferMode,
    pub conflict: ConflictPolicy,
    /// Drop the relative directory structure and write every file to the target root.
    pub flatten: bool,
}

impl ExtractOptions {
    /// Options with every field at its configured default.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            pattern: None,
            recursive: settings.extract.recursive,
            mode: TransferMode::Copy,
            conflict: settings.extract.conflict_resolution,
            flatten: settings.extract.flatten,
        }
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// The outcome of a completed extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    pub source: PathBuf,
    pub target: PathBuf,
    pub mode: TransferMode,
    pub summary: ExtractSummary,
}

/// Runs extractions with fixed options.
pub struct Extractor {
    options: ExtractOptions,
    max_rename_attempts: usize,
}

impl Extractor {
    pub fn new(options: ExtractOptions, settings: &Settings) -> Self {
        Self {
            options,
            max_rename_attempts: settings.extract.max_rename_attempts,
        }
    }

    /// Extracts matching files from `source` into `target`.
    ///
    /// The source must be an existing directory; the target is created if
    /// needed. Nothing is written before both checks pass.
    pub fn run(&self, source: &Path, target: &Path) -> OperationResult<ExtractReport> {
        error::require_directory(source)?;
        let matcher = GlobMatcher::compile(self.options.pattern.as_deref())?;
        error::ensure_directory(target)?;

        info!(
            "Extracting from {} to {} ({}, conflicts: {})",
            source.display(),
            target.display(),
            self.options.mode.as_str(),
            self.options.conflict
        );

        let visitor = ExtractVisitor {
            target,
            matcher,
            resolver: ConflictResolver::new(self.options.conflict, self.max_rename_attempts),
            mode: self.options.mode,
            flatten: self.options.flatten,
        };
        let summary = TreeWalker::new(self.options.recursive)
            .skip_dir(target)
            .walk(source, &visitor);

        info!(
            "Extraction finished: {} processed, {} conflicts, {} errors",
            summary.processed, summary.conflicts, summary.errors
        );

        Ok(ExtractReport {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            mode: self.options.mode,
            summary,
        })
    }
}

struct ExtractVisitor<'a> {
    target: &'a Path,
    matcher: GlobMatcher,
    resolver: ConflictResolver,
    mode: TransferMode,
    flatten: bool,
}

impl ExtractVisitor<'_> {
    fn target_for(&self, entry: &DirectoryEntry) -> PathBuf {
        if self.flatten {
            self.target.join(&entry.file_name)
        } else {
            paths::join(self.target, &entry.relative_path)
        }
    }
}

impl Visitor for ExtractVisitor<'_> {
    type Summary = ExtractSummary;

    fn visit_file(&self, entry: &DirectoryEntry) -> ExtractSummary {
        if !self.matcher.matches(&entry.name) {
            return ExtractSummary::default();
        }

        let candidate = self.target_for(entry);
        let resolution = match self.resolver.resolve(&candidate) {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!("Error processing file {}: {}", entry.full_path.display(), e);
                return ExtractSummary::failed(Failure::new(&entry.full_path, e), false);
            }
        };
        let conflict = resolution.is_conflict();

        let Some(final_target) = resolution.target() else {
            debug!("Skipping {}: target exists", entry.full_path.display());
            return ExtractSummary::skipped_conflict();
        };
        if let Resolution::Renamed(path) = &resolution {
            debug!("Target exists, writing {} instead", path.display());
        }

        let plan = TransferPlan::new(&entry.full_path, final_target, self.mode);
        match Transfer::execute(&plan) {
            Ok(()) => ExtractSummary::transferred(conflict),
            Err(e) => {
                warn!("Error processing file {}: {}", entry.full_path.display(), e);
                ExtractSummary::failed(Failure::new(&entry.full_path, e), conflict)
            }
        }
    }

    fn walk_failed(&self, path: &Path, error: io::Error) -> ExtractSummary {
        ExtractSummary::failed(Failure::new(path, error), false)
    }
}

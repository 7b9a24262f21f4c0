//! Depth-first directory traversal.
//!
//! [`TreeWalker`] enumerates a directory in whatever order the host
//! filesystem yields, hands each entry to a [`Visitor`], and recurses into
//! subdirectories as soon as they are met. Visitors return a summary value
//! per entry; the walker adds them up and returns the total for the tree.
//!
//! A directory that cannot be read is reported once through
//! [`Visitor::walk_failed`] and the walk carries on with its siblings.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::ops::Add;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What a directory entry is, as reported by the entry itself (links are not followed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Symlinks, sockets, devices and the like.
    Other,
}

/// One entry produced during a traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// The final path component, lossily decoded; used for matching and display.
    pub name: String,
    /// The final path component as stored on disk; used to build target paths.
    pub file_name: OsString,
    pub full_path: PathBuf,
    /// Path relative to the root the walk started from.
    pub relative_path: PathBuf,
    pub kind: EntryKind,
}

impl DirectoryEntry {
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Callbacks invoked by [`TreeWalker::walk`].
pub trait Visitor {
    type Summary: Default + Add<Output = Self::Summary>;

    /// Called for each regular file.
    fn visit_file(&self, entry: &DirectoryEntry) -> Self::Summary;

    /// Called for each directory, after its children when the walk is recursive.
    fn leave_dir(&self, _entry: &DirectoryEntry) -> Self::Summary {
        Self::Summary::default()
    }

    /// Called for entries that are neither files nor directories.
    fn visit_other(&self, _entry: &DirectoryEntry) -> Self::Summary {
        Self::Summary::default()
    }

    /// Called when a directory or one of its entries cannot be read.
    fn walk_failed(&self, path: &Path, error: io::Error) -> Self::Summary;
}

/// Recursive or single-level directory walker.
#[derive(Debug, Clone, Default)]
pub struct TreeWalker {
    recursive: bool,
    skipped: Vec<PathBuf>,
}

impl TreeWalker {
    pub fn new(recursive: bool) -> Self {
        Self {
            recursive,
            skipped: Vec::new(),
        }
    }

    /// Never descends into `dir`.
    ///
    /// Paths are compared after canonicalisation; a path that cannot be
    /// canonicalised (it does not exist yet) is ignored.
    pub fn skip_dir(mut self, dir: &Path) -> Self {
        if let Ok(canonical) = dir.canonicalize() {
            self.skipped.push(canonical);
        }
        self
    }

    /// Walks `root` and returns the sum of every visitor result.
    pub fn walk<V: Visitor>(&self, root: &Path, visitor: &V) -> V::Summary {
        self.walk_dir(root, Path::new(""), visitor)
    }

    fn walk_dir<V: Visitor>(&self, dir: &Path, relative: &Path, visitor: &V) -> V::Summary {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Error reading directory {}: {}", dir.display(), e);
                return visitor.walk_failed(dir, e);
            }
        };

        let mut summary = V::Summary::default();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Error reading entry in {}: {}", dir.display(), e);
                    summary = summary + visitor.walk_failed(dir, e);
                    continue;
                }
            };

            let full_path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    warn!("Error reading file type of {}: {}", full_path.display(), e);
                    summary = summary + visitor.walk_failed(&full_path, e);
                    continue;
                }
            };

            let name = entry.file_name();
            let relative_path = relative.join(&name);
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };
            let dir_entry = DirectoryEntry {
                name: name.to_string_lossy().into_owned(),
                file_name: name,
                full_path,
                relative_path,
                kind,
            };

            summary = summary
                + match kind {
                    EntryKind::Directory => {
                        let children = if self.recursive && !self.is_skipped(&dir_entry.full_path)
                        {
                            self.walk_dir(&dir_entry.full_path, &dir_entry.relative_path, visitor)
                        } else {
                            V::Summary::default()
                        };
                        children + visitor.leave_dir(&dir_entry)
                    }
                    EntryKind::File => visitor.visit_file(&dir_entry),
                    EntryKind::Other => visitor.visit_other(&dir_entry),
                };
        }
        summary
    }

    fn is_skipped(&self, dir: &Path) -> bool {
        if self.skipped.is_empty() {
            return false;
        }
        let skip = dir
            .canonicalize()
            .map(|canonical| self.skipped.contains(&canonical))
            .unwrap_or(false);
        if skip {
            debug!("Not descending into {}", dir.display());
        }
        skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    /// Collects the relative paths of everything visited.
    struct Collect;

    #[derive(Default)]
    struct Seen {
        files: BTreeSet<PathBuf>,
        dirs: Vec<PathBuf>,
        errors: usize,
    }

    impl Add for Seen {
        type Output = Seen;
        fn add(mut self, rhs: Seen) -> Seen {
            self.files.extend(rhs.files);
            self.dirs.extend(rhs.dirs);
            self.errors += rhs.errors;
            self
        }
    }

    impl Visitor for Collect {
        type Summary = Seen;

        fn visit_file(&self, entry: &DirectoryEntry) -> Seen {
            Seen {
                files: BTreeSet::from([entry.relative_path.clone()]),
                ..Seen::default()
            }
        }

        fn leave_dir(&self, entry: &DirectoryEntry) -> Seen {
            Seen {
                dirs: vec![entry.relative_path.clone()],
                ..Seen::default()
            }
        }

        fn walk_failed(&self, _path: &Path, _error: io::Error) -> Seen {
            Seen {
                errors: 1,
                ..Seen::default()
            }
        }
    }

    fn tree() -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("sub").join("deeper")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("sub").join("b.txt"), "b").unwrap();
        fs::write(root.join("sub").join("deeper").join("c.txt"), "c").unwrap();
        temp_dir
    }

    #[test]
    fn test_recursive_walk_uses_root_relative_paths() {
        let temp_dir = tree();
        let seen = TreeWalker::new(true).walk(temp_dir.path(), &Collect);

        let expected: BTreeSet<PathBuf> = [
            PathBuf::from("a.txt"),
            Path::new("sub").join("b.txt"),
            Path::new("sub").join("deeper").join("c.txt"),
        ]
        .into_iter()
        .collect();
        assert_eq!(seen.files, expected);
        assert_eq!(seen.dirs.len(), 2);
        assert_eq!(seen.errors, 0);
    }

    #[test]
    fn test_children_are_visited_before_leaving_directory() {
        let temp_dir = tree();
        let seen = TreeWalker::new(true).walk(temp_dir.path(), &Collect);

        let deeper = seen
            .dirs
            .iter()
            .position(|d| d == &Path::new("sub").join("deeper"))
            .unwrap();
        let sub = seen.dirs.iter().position(|d| d == Path::new("sub")).unwrap();
        assert!(deeper < sub);
    }

    #[test]
    fn test_non_recursive_walk_stays_at_top_level() {
        let temp_dir = tree();
        let seen = TreeWalker::new(false).walk(temp_dir.path(), &Collect);

        assert_eq!(seen.files, BTreeSet::from([PathBuf::from("a.txt")]));
        assert_eq!(seen.dirs, vec![PathBuf::from("sub")]);
    }

    #[test]
    fn test_skipped_directory_is_not_entered() {
        let temp_dir = tree();
        let seen = TreeWalker::new(true)
            .skip_dir(&temp_dir.path().join("sub"))
            .walk(temp_dir.path(), &Collect);

        assert_eq!(seen.files, BTreeSet::from([PathBuf::from("a.txt")]));
        assert_eq!(seen.dirs, vec![PathBuf::from("sub")]);
    }

    #[test]
    fn test_unreadable_root_counts_one_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let seen = TreeWalker::new(true).walk(&temp_dir.path().join("missing"), &Collect);
        assert_eq!(seen.errors, 1);
        assert!(seen.files.is_empty());
    }
}

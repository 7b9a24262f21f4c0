//! Single-file copy and move.
//!
//! Copies are streamed into a temporary file next to the target and then
//! persisted over it, so a failed copy never leaves a truncated target in
//! place. Moves are a plain rename and fail across filesystems.

use crate::paths;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Whether a transfer keeps or removes the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    #[default]
    Copy,
    Move,
}

impl TransferMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferMode::Copy => "copy",
            TransferMode::Move => "move",
        }
    }
}

/// One file transfer, consumed by [`Transfer::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    pub source: PathBuf,
    pub target: PathBuf,
    pub mode: TransferMode,
}

impl TransferPlan {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>, mode: TransferMode) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            mode,
        }
    }
}

/// Errors that can occur while transferring one file.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The target's parent directory could not be created.
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    /// Reading the source or writing the temporary copy failed.
    #[error("Failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    /// The rename primitive failed (including cross-device moves).
    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Executes transfer plans against the host filesystem.
pub struct Transfer;

impl Transfer {
    /// Copies or moves `plan.source` to `plan.target`, creating parent directories.
    ///
    /// An existing target is replaced; conflict policy is decided by the caller.
    pub fn execute(plan: &TransferPlan) -> Result<(), TransferError> {
        let parent = paths::parent_of(&plan.target);
        fs::create_dir_all(&parent).map_err(|e| TransferError::CreateDir {
            path: parent.clone(),
            source: e,
        })?;

        match plan.mode {
            TransferMode::Move => fs::rename(&plan.source, &plan.target).map_err(|e| {
                TransferError::Move {
                    from: plan.source.clone(),
                    to: plan.target.clone(),
                    source: e,
                }
            }),
            TransferMode::Copy => {
                copy_via_temp(&plan.source, &plan.target, &parent).map_err(|e| {
                    TransferError::Copy {
                        from: plan.source.clone(),
                        to: plan.target.clone(),
                        source: e,
                    }
                })
            }
        }
    }
}

/// Streams `source` into a temp file inside `dir`, then persists it as `target`.
///
/// The temp file is deleted on drop if any step fails.
fn copy_via_temp(source: &Path, target: &Path, dir: &Path) -> io::Result<()> {
    let mut reader = File::open(source)?;
    let permissions = reader.metadata()?.permissions();

    let mut temp = NamedTempFile::new_in(dir)?;
    io::copy(&mut reader, temp.as_file_mut())?;
    temp.as_file().sync_all()?;
    fs::set_permissions(temp.path(), permissions)?;

    temp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_creates_parent_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("a.bin");
        fs::write(&source, [1u8, 2, 3, 4]).expect("Failed to write source");
        let target = temp_dir.path().join("out").join("deep").join("a.bin");

        Transfer::execute(&TransferPlan::new(&source, &target, TransferMode::Copy))
            .expect("Copy failed");

        assert!(source.exists());
        assert_eq!(fs::read(&target).unwrap(), vec![1u8, 2, 3, 4]);
    }

    #[test]
    fn test_copy_replaces_existing_target() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("new.txt");
        let target = temp_dir.path().join("old.txt");
        fs::write(&source, "new").unwrap();
        fs::write(&target, "old content that is longer").unwrap();

        Transfer::execute(&TransferPlan::new(&source, &target, TransferMode::Copy))
            .expect("Copy failed");

        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn test_move_removes_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("a.txt");
        fs::write(&source, "payload").unwrap();
        let target = temp_dir.path().join("moved").join("a.txt");

        Transfer::execute(&TransferPlan::new(&source, &target, TransferMode::Move))
            .expect("Move failed");

        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "payload");
    }

    #[test]
    fn test_failed_copy_leaves_no_target_or_temp_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let out = temp_dir.path().join("out");
        let target = out.join("missing.txt");

        let result = Transfer::execute(&TransferPlan::new(
            temp_dir.path().join("missing.txt"),
            &target,
            TransferMode::Copy,
        ));

        assert!(matches!(result, Err(TransferError::Copy { .. })));
        assert!(!target.exists());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_move_of_missing_source_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = Transfer::execute(&TransferPlan::new(
            temp_dir.path().join("nope"),
            temp_dir.path().join("dest"),
            TransferMode::Move,
        ));
        assert!(matches!(result, Err(TransferError::Move { .. })));
    }
}

//! Errors that stop an operation before it touches the filesystem.
//!
//! Per-entry problems are never reported here; they are counted in the
//! operation's summary instead.

use crate::pattern::PatternError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// The source path is missing or is not a directory.
    #[error("The directory '{}' does not exist or is not a valid directory", .path.display())]
    InvalidSource { path: PathBuf },
    /// The target directory could not be created.
    #[error("Failed to create target directory {}: {source}", .path.display())]
    TargetInit { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Result type for top-level operations.
pub type OperationResult<T> = Result<T, OperationError>;

/// Checks that `path` exists and is a directory.
pub fn require_directory(path: &Path) -> OperationResult<()> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        _ => Err(OperationError::InvalidSource {
            path: path.to_path_buf(),
        }),
    }
}

/// Creates `path` and its parents if needed.
pub fn ensure_directory(path: &Path) -> OperationResult<()> {
    fs::create_dir_all(path).map_err(|e| OperationError::TargetInit {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_require_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(require_directory(temp_dir.path()).is_ok());
        assert!(matches!(
            require_directory(&file),
            Err(OperationError::InvalidSource { .. })
        ));
        assert!(require_directory(&temp_dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_invalid_source_message_names_the_path() {
        let err = OperationError::InvalidSource {
            path: PathBuf::from("/no/such/dir"),
        };
        assert_eq!(
            err.to_string(),
            "The directory '/no/such/dir' does not exist or is not a valid directory"
        );
    }

    #[test]
    fn test_ensure_directory_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested = temp_dir.path().join("a").join("b");
        ensure_directory(&nested).unwrap();
        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());
    }
}

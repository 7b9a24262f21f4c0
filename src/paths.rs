//! Path helpers shared by the traversal and transfer code.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Joins `relative` onto `base` using the platform separator.
pub fn join(base: &Path, relative: &Path) -> PathBuf {
    base.join(relative)
}

/// Returns the directory containing `path`, or `path` itself when it has no parent.
pub fn parent_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        Some(_) => PathBuf::from("."),
        None => path.to_path_buf(),
    }
}

/// Splits the final component of `path` into stem and extension.
///
/// Leading-dot names such as `.bashrc` have no extension, and only the last
/// dot counts: `a.tar.gz` splits into `a.tar` and `gz`. The raw bytes of the
/// name are kept, so names that are not valid UTF-8 survive unchanged.
pub fn split_ext(path: &Path) -> (&OsStr, Option<&OsStr>) {
    (path.file_stem().unwrap_or_default(), path.extension())
}

/// Builds the `n`-th numbered sibling of `path`: `dir/stem_n.ext`.
pub fn numbered_sibling(path: &Path, n: usize) -> PathBuf {
    let (stem, ext) = split_ext(path);
    let mut name = OsString::from(stem);
    name.push(format!("_{}", n));
    if let Some(ext) = ext {
        name.push(".");
        name.push(ext);
    }
    parent_of(path).join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_ext() {
        assert_eq!(
            split_ext(Path::new("dir/photo.JPG")),
            (OsStr::new("photo"), Some(OsStr::new("JPG")))
        );
        assert_eq!(
            split_ext(Path::new("a.tar.gz")),
            (OsStr::new("a.tar"), Some(OsStr::new("gz")))
        );
        assert_eq!(split_ext(Path::new(".bashrc")), (OsStr::new(".bashrc"), None));
        assert_eq!(split_ext(Path::new("README")), (OsStr::new("README"), None));
    }

    #[cfg(unix)]
    #[test]
    fn test_numbered_sibling_keeps_raw_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let original = Path::new("/t").join(OsStr::from_bytes(b"a\xff.txt"));
        assert_eq!(
            numbered_sibling(&original, 1),
            Path::new("/t").join(OsStr::from_bytes(b"a\xff_1.txt"))
        );
    }

    #[test]
    fn test_numbered_sibling() {
        assert_eq!(
            numbered_sibling(Path::new("/t/a.txt"), 2),
            PathBuf::from("/t/a_2.txt")
        );
        assert_eq!(
            numbered_sibling(Path::new("/t/Makefile"), 1),
            PathBuf::from("/t/Makefile_1")
        );
        assert_eq!(
            numbered_sibling(Path::new("/t/.env"), 3),
            PathBuf::from("/t/.env_3")
        );
    }

    #[test]
    fn test_parent_of() {
        assert_eq!(parent_of(Path::new("/a/b/c.txt")), PathBuf::from("/a/b"));
        assert_eq!(parent_of(Path::new("c.txt")), PathBuf::from("."));
        assert_eq!(parent_of(Path::new("/")), PathBuf::from("/"));
    }

    #[test]
    fn test_join_keeps_relative_structure() {
        let joined = join(Path::new("/target"), Path::new("sub/b.jpg"));
        assert_eq!(joined, PathBuf::from("/target/sub/b.jpg"));
    }
}

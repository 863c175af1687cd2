//! Filesystem probe for `path` handlers.

use std::io;
use std::path::{Path, PathBuf};

/// What a path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathInfo {
    pub is_dir: bool,
}

/// Filesystem queries needed to mount a path handler.
pub trait Filesystem: Send + Sync {
    /// Fails if the path does not exist or cannot be inspected.
    fn stat(&self, path: &Path) -> io::Result<PathInfo>;

    /// Absolute form of `path` relative to the working directory. Symlinks
    /// are not resolved.
    fn absolute_path(&self, path: &Path) -> io::Result<PathBuf>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn stat(&self, path: &Path) -> io::Result<PathInfo> {
        let meta = std::fs::metadata(path)?;
        Ok(PathInfo {
            is_dir: meta.is_dir(),
        })
    }

    fn absolute_path(&self, path: &Path) -> io::Result<PathBuf> {
        std::path::absolute(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("foo");
        std::fs::write(&file, "this is foo").unwrap();

        assert!(OsFilesystem.stat(dir.path()).unwrap().is_dir);
        assert!(!OsFilesystem.stat(&file).unwrap().is_dir);
        assert_eq!(
            OsFilesystem.stat(&dir.path().join("missing")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_absolute_path() {
        let abs = OsFilesystem.absolute_path(Path::new("some/rel")).unwrap();
        assert!(abs.is_absolute());
        assert!(abs.ends_with("some/rel"));
    }
}

//! Filesystem access for the store, the config loader and credential encoding.
//!
//! Nothing in the core calls `std::fs` directly. Production code runs on
//! [`RealFileSystem`]; tests swap in an in-memory implementation.

mod native;

pub use native::RealFileSystem;

use std::io;
use std::path::{Path, PathBuf};

/// The disk operations a sync run needs.
pub trait FileSystem {
    /// Whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Create or truncate `path`, then write `content`.
    fn write_file(&self, path: &Path, content: &str) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Create `path` with any missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Direct children of `dir` (files and directories), sorted by path.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Last modification time in milliseconds since the Unix epoch, when the
    /// platform reports one.
    fn modified_time(&self, path: &Path) -> Option<i64>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        (**self).write_file(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).create_dir_all(path)
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        (**self).list_dir(dir)
    }

    fn modified_time(&self, path: &Path) -> Option<i64> {
        (**self).modified_time(path)
    }
}

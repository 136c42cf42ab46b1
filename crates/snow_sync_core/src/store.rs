//! Local script store.
//!
//! Scripts live under a sync root, one subdirectory per table key:
//! `sync/<table_key>/<snake_case(name)>.js`. All paths are built explicitly
//! from the root; the store never changes the process working directory.

use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};
use crate::fs::FileSystem;
use crate::naming::{SCRIPT_EXTENSION, script_file_name};

/// Default sync root, relative to the working directory.
pub const DEFAULT_SYNC_DIR: &str = "sync";

/// Reads and writes materialized scripts through a [`FileSystem`].
pub struct LocalStore<FS> {
    fs: FS,
    root: PathBuf,
}

impl<FS: FileSystem> LocalStore<FS> {
    pub fn new(fs: FS, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fs(&self) -> &FS {
        &self.fs
    }

    pub fn into_fs(self) -> FS {
        self.fs
    }

    /// Directory holding a table's scripts.
    pub fn table_dir(&self, table_key: &str) -> PathBuf {
        self.root.join(table_key)
    }

    /// Path of a script file inside a table directory.
    pub fn script_path(&self, table_key: &str, file_name: &str) -> PathBuf {
        self.table_dir(table_key).join(file_name)
    }

    /// Create `path` and any missing ancestors.
    ///
    /// Returns `true` when the directory was created, `false` when it already
    /// existed.
    pub fn ensure_directory(&self, path: &Path) -> Result<bool> {
        if self.fs.is_dir(path) {
            return Ok(false);
        }
        self.fs.create_dir_all(path)?;
        log::info!("++: {}", path.display());
        Ok(true)
    }

    /// Write a script for `display_name`, replacing any previous content.
    pub fn write_script(
        &self,
        table_key: &str,
        display_name: &str,
        content: &str,
    ) -> Result<PathBuf> {
        let dir = self.table_dir(table_key);
        self.ensure_directory(&dir)?;

        let file_name = script_file_name(display_name);
        let path = dir.join(&file_name);
        self.fs
            .write_file(&path, content)
            .map_err(|e| SyncError::FileWrite {
                path: path.clone(),
                source: e,
            })?;
        log::info!("->: {}", file_name);
        Ok(path)
    }

    /// Read a script's current content.
    pub fn read_script(&self, table_key: &str, file_name: &str) -> Result<String> {
        let path = self.script_path(table_key, file_name);
        if !self.fs.exists(&path) {
            return Err(SyncError::not_found(path.display().to_string()));
        }
        self.fs
            .read_to_string(&path)
            .map_err(|e| SyncError::FileRead { path, source: e })
    }

    /// Every script under the root as `(table_key, path)`, sorted by path.
    pub fn list_scripts(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut scripts = Vec::new();
        if !self.fs.is_dir(&self.root) {
            return Ok(scripts);
        }

        for dir in self.fs.list_dir(&self.root)? {
            if !self.fs.is_dir(&dir) {
                continue;
            }
            let Some(table_key) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            for file in self.fs.list_dir(&dir)? {
                if file.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION) {
                    scripts.push((table_key.to_string(), file));
                }
            }
        }

        scripts.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(scripts)
    }
}

//! Polling change detection over the local store.
//!
//! The detector keeps the last seen modification time of every script. The
//! first [`ChangeDetector::poll`] only records a baseline; later polls return
//! the scripts that appeared or whose modification time moved.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::fs::FileSystem;
use crate::store::LocalStore;

#[derive(Debug, Default)]
pub struct ChangeDetector {
    seen: HashMap<PathBuf, Option<i64>>,
    primed: bool,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts changed since the previous poll, sorted by path.
    pub fn poll<FS: FileSystem>(&mut self, store: &LocalStore<FS>) -> Result<Vec<PathBuf>> {
        let mut changed = Vec::new();
        let mut current = HashMap::new();

        for (_, path) in store.list_scripts()? {
            let mtime = store.fs().modified_time(&path);
            if self.primed && self.seen.get(&path) != Some(&mtime) {
                changed.push(path.clone());
            }
            current.insert(path, mtime);
        }

        self.seen = current;
        self.primed = true;
        Ok(changed)
    }

    /// Forget the baseline; the next poll re-primes without reporting.
    pub fn reset(&mut self) {
        self.seen.clear();
        self.primed = false;
    }
}

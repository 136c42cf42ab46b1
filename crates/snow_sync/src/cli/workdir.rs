use std::path::{Path, PathBuf};

use crate::cli::util::CliError;

/// Changes the process working directory and changes it back on drop.
#[derive(Debug)]
pub struct ScopedDir {
    previous: PathBuf,
}

impl ScopedDir {
    pub fn enter(dir: &Path) -> Result<Self, CliError> {
        let enter_err = |source| CliError::EnterDir {
            path: dir.to_path_buf(),
            source,
        };
        let previous = std::env::current_dir().map_err(enter_err)?;
        std::env::set_current_dir(dir).map_err(enter_err)?;
        log::debug!("Entered {}", dir.display());
        Ok(Self { previous })
    }
}

impl Drop for ScopedDir {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            log::warn!("Could not return to {}: {}", self.previous.display(), e);
        }
    }
}

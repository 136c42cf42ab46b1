//! Shared CLI utilities

use std::path::PathBuf;

use snow_sync_core::config::Config;
use snow_sync_core::engine::{SyncEngine, SyncReport};
use snow_sync_core::error::SyncError;
use snow_sync_core::fs::RealFileSystem;
use snow_sync_core::transport::ReqwestTransport;
use thiserror::Error;

use crate::cli::CliEngine;

/// Errors raised by the CLI layer itself.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot enter directory '{path}': {source}")]
    EnterDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// A located configuration file and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub path: PathBuf,
    /// Found in the user config directory rather than the working directory.
    pub user_dir: bool,
}

impl ConfigFile {
    pub fn local(path: PathBuf) -> Self {
        Self {
            path,
            user_dir: false,
        }
    }

    pub fn user(path: PathBuf) -> Self {
        Self {
            path,
            user_dir: true,
        }
    }

    /// Load the config. A relative `conf_path` in a user-dir config is
    /// resolved against that file's directory.
    pub fn load(&self) -> Result<Config, CliError> {
        let mut config = Config::load_from(&RealFileSystem, &self.path)?;
        if self.user_dir
            && let Some(parent) = self.path.parent()
        {
            config.anchor_conf_path(parent);
        }
        Ok(config)
    }
}

/// Load the config and build an engine over the real filesystem and network.
pub fn open_engine(file: &ConfigFile) -> Result<CliEngine, CliError> {
    let config = file.load()?;
    Ok(SyncEngine::new(config, RealFileSystem, ReqwestTransport::new()))
}

/// Print one line per item and return whether every item succeeded.
pub fn print_report(verb: &str, report: &SyncReport) -> bool {
    for id in &report.succeeded {
        println!("✓ {} {}", verb, id);
    }
    for failed in &report.failed {
        eprintln!("✗ {}: {}", failed.item, failed.error);
    }
    if report.is_empty() {
        println!("Nothing to do.");
    }
    report.is_success()
}

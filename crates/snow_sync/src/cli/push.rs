//! Push command handler

use std::path::PathBuf;

use snow_sync_core::notify::LogNotifier;

use crate::cli::util::{CliError, ConfigFile, open_engine, print_report};

/// Handle the push command
/// Returns true when every file was pushed
pub fn handle_push(config_file: &ConfigFile, patterns: &[String]) -> bool {
    let paths = match expand_patterns(patterns) {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };

    let mut engine = match open_engine(config_file) {
        Ok(engine) => engine.with_notifier(LogNotifier),
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };

    if let Err(e) = engine.validate() {
        eprintln!("✗ {}", e);
        return false;
    }

    print_report("Pushed", &engine.push(&paths))
}

/// Expand glob patterns into files, keeping argument order.
///
/// A pattern that matches nothing is passed through as a literal path so the
/// push reports it as missing instead of silently skipping it. Duplicates are
/// pushed once.
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>, CliError> {
    let mut paths = Vec::new();

    for pattern in patterns {
        let entries = glob::glob(pattern).map_err(|source| CliError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;

        let mut matched = false;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    matched = true;
                    if !paths.contains(&path) {
                        paths.push(path);
                    }
                }
                Ok(_) => {}
                Err(e) => log::warn!("Skipping {}: {}", e.path().display(), e.error()),
            }
        }

        if !matched {
            let literal = PathBuf::from(pattern);
            if !paths.contains(&literal) {
                paths.push(literal);
            }
        }
    }
    Ok(paths)
}

//! Sync command handler

use crate::cli::util::{ConfigFile, open_engine, print_report};

/// Handle the sync command
/// Returns true when every entry was pulled
pub fn handle_sync(config_file: &ConfigFile) -> bool {
    let mut engine = match open_engine(config_file) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };

    match engine.run_full_sync() {
        Ok(report) => print_report("Pulled", &report),
        Err(e) => {
            eprintln!("✗ {}", e);
            false
        }
    }
}

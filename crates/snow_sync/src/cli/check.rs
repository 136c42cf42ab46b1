//! Check command handler

use snow_sync_core::validate::validate;

use crate::cli::util::ConfigFile;

/// Handle the check command
/// Returns true when the configuration is complete
pub fn handle_check(config_file: &ConfigFile) -> bool {
    let config = match config_file.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };

    match validate(&config) {
        Ok(()) => {
            println!(
                "✓ {} is valid ({} table(s))",
                config_file.path.display(),
                config.table_map.len()
            );
            if !config.creds.encoded {
                println!("  Credentials will be encoded on the next sync.");
            }
            true
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            false
        }
    }
}

//! Config command handler

use snow_sync_core::config::Config;

use crate::cli::util::ConfigFile;

const MASK: &str = "********";

pub fn handle_config(config_file: &ConfigFile) -> bool {
    let config = match config_file.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };

    match serde_yaml::to_string(&masked(config)) {
        Ok(yaml) => {
            println!("Config file: {}", config_file.path.display());
            println!();
            print!("{}", yaml);
            true
        }
        Err(e) => {
            eprintln!("✗ Failed to render config: {}", e);
            false
        }
    }
}

/// Copy of `config` safe to print: credential values are replaced.
fn masked(mut config: Config) -> Config {
    if config.creds.user.is_some() {
        config.creds.user = Some(MASK.to_string());
    }
    if config.creds.pass.is_some() {
        config.creds.pass = Some(MASK.to_string());
    }
    config
}

/// Clap argument definitions
mod args;

/// `check` command
mod check;

/// `config` command (masked display)
mod config;

/// `push` command and glob expansion
mod push;

/// `sync` command
mod sync;

/// Shared CLI helpers
mod util;

/// `watch` poll loop
mod watch;

/// Scoped working directory for `--dir`
mod workdir;

use clap::Parser;
use std::path::{Path, PathBuf};

use snow_sync_core::config::DEFAULT_CONFIG_FILE;
use snow_sync_core::engine::SyncEngine;
use snow_sync_core::fs::RealFileSystem;
use snow_sync_core::transport::ReqwestTransport;

pub use args::Cli;
use args::Commands;
use util::ConfigFile;
use workdir::ScopedDir;

/// Engine type used by every command.
pub type CliEngine = SyncEngine<RealFileSystem, ReqwestTransport>;

/// Main entry point for the CLI
pub fn run_cli() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let success = {
        // Restored when this block ends, before any exit.
        let _dir = match cli.dir.as_deref().map(ScopedDir::enter).transpose() {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("✗ {}", e);
                std::process::exit(1);
            }
        };

        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let config_dir = dirs::config_dir().map(|dir| dir.join("snow_sync"));
        let config_file = locate_config(cli.config, &cwd, config_dir.as_deref());
        log::debug!("Using config {}", config_file.path.display());

        match cli.command {
            Commands::Sync => sync::handle_sync(&config_file),
            Commands::Push { paths } => push::handle_push(&config_file, &paths),
            Commands::Watch { interval } => watch::handle_watch(&config_file, interval),
            Commands::Check => check::handle_check(&config_file),
            Commands::Config => config::handle_config(&config_file),
        }
    };

    if !success {
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Pick the configuration file to use.
///
/// An explicit path always wins. Otherwise `configs.yml` in `cwd` is used if
/// present, then `configs.yml` in the user config directory. When neither
/// exists the working-directory path is returned so the load error names it.
fn locate_config(explicit: Option<PathBuf>, cwd: &Path, config_dir: Option<&Path>) -> ConfigFile {
    if let Some(path) = explicit {
        return ConfigFile::local(path);
    }

    let local = cwd.join(DEFAULT_CONFIG_FILE);
    if local.is_file() {
        return ConfigFile::local(local);
    }

    if let Some(dir) = config_dir {
        let global = dir.join(DEFAULT_CONFIG_FILE);
        if global.is_file() {
            return ConfigFile::user(global);
        }
    }
    ConfigFile::local(local)
}

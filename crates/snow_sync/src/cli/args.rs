//! Command-line argument structures and enums

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snow_sync")]
#[command(version)]
#[command(
    about = "Keep ServiceNow script fields in sync with local files",
    long_about = None
)]
pub struct Cli {
    /// Configuration file (default: ./configs.yml, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Run inside this directory
    #[arg(short = 'C', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the config, encode credentials once, and pull every script
    #[command(alias = "pull")]
    Sync,

    /// Push local scripts to their records
    Push {
        /// Script paths or glob patterns (e.g. "sync/script_include/*.js")
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Watch the sync directory and push scripts as they change
    Watch {
        /// Seconds between polls
        #[arg(short, long, default_value_t = 2)]
        interval: u64,
    },

    /// Check that every required configuration item is present
    Check,

    /// Show the configuration with credentials masked
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_push_with_globals() {
        let cli = Cli::try_parse_from([
            "snow_sync",
            "push",
            "-c",
            "conf/test_configs.yml",
            "sync/script_include/*.js",
            "sync/business_rule/on_insert.js",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("conf/test_configs.yml")));
        assert!(!cli.verbose);
        match cli.command {
            Commands::Push { paths } => assert_eq!(
                paths,
                vec!["sync/script_include/*.js", "sync/business_rule/on_insert.js"]
            ),
            _ => panic!("expected push"),
        }
    }

    #[test]
    fn test_push_requires_paths() {
        assert!(Cli::try_parse_from(["snow_sync", "push"]).is_err());
    }

    #[test]
    fn test_watch_interval_default() {
        let cli = Cli::try_parse_from(["snow_sync", "-v", "watch"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Watch { interval: 2 }));

        let cli = Cli::try_parse_from(["snow_sync", "watch", "--interval", "10"]).unwrap();
        assert!(matches!(cli.command, Commands::Watch { interval: 10 }));
    }

    #[test]
    fn test_pull_alias_and_dir() {
        let cli = Cli::try_parse_from(["snow_sync", "-C", "project", "pull"]).unwrap();
        assert_eq!(cli.dir, Some(PathBuf::from("project")));
        assert!(matches!(cli.command, Commands::Sync));
    }
}

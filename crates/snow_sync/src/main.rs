#![doc = include_str!("../README.md")]

/// CLI module - command-line interface for snow_sync
mod cli;

fn main() {
    cli::run_cli();
}

#![doc = include_str!("../README.md")]

/// Configuration document (instance, credentials, table map)
pub mod config;

/// Credential encoding at rest and Basic auth headers
pub mod credentials;

/// Sync engine (pull, push, full sync)
pub mod engine;

/// Error (common error types)
pub mod error;

/// Filesystem abstraction
pub mod fs;

/// Script file names and table entry resolution
pub mod naming;

/// Notification hook for pushed scripts
pub mod notify;

/// Local script store under the sync root
pub mod store;

/// HTTP transport abstraction
pub mod transport;

/// Validate (check required configuration)
pub mod validate;

/// Change detection for watch mode
pub mod watch;

#[cfg(test)]
pub mod test_utils;

pub use config::{Config, Credentials, TableEntry, TableMap};
pub use engine::{SyncEngine, SyncReport};
pub use error::{Result, SyncError};

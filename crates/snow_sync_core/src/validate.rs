//! Required-field validation for a [`Config`].
//!
//! Validation is exhaustive: every missing item is collected so the operator
//! can fix the configuration in one pass.

use crate::config::Config;
use crate::error::{Result, SyncError};

/// Every required item that is absent, as dotted config paths.
pub fn missing_items(config: &Config) -> Vec<String> {
    let mut missing = Vec::new();

    if config.conf_path.is_none() {
        missing.push("conf_path".to_string());
    }
    if config.base_url.is_none() {
        missing.push("base_url".to_string());
    }
    if config.creds.user.is_none() {
        missing.push("creds.user".to_string());
    }
    if config.creds.pass.is_none() {
        missing.push("creds.pass".to_string());
    }
    if config.table_map.is_empty() {
        missing.push("table_map".to_string());
    }

    for (key, entry) in &config.table_map {
        for field in entry.missing_fields() {
            missing.push(format!("table_map.{key}.{field}"));
        }
    }

    missing
}

/// Fail with [`SyncError::Config`] unless every required item is present.
pub fn validate(config: &Config) -> Result<()> {
    let missing = missing_items(config);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SyncError::Config { missing })
    }
}

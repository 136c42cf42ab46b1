//! Mapping between local script file names and configured table entries.
//!
//! A script's file name is the only identity it carries once it sits on disk:
//! `test_class.js` classifies to the display name `TestClass`, which must
//! match the `name` of exactly one entry in the table map.

use std::path::Path;

use crate::config::{TableEntry, TableMap};
use crate::error::{Result, SyncError};

/// Extension used for materialized scripts.
pub const SCRIPT_EXTENSION: &str = "js";

/// Derive a display name from a script file name.
///
/// Only the final path component is considered. Everything from the first
/// `.` is dropped, the rest is split on underscores and whitespace, and each
/// segment is capitalized and joined.
///
/// # Example
/// ```
/// use snow_sync_core::naming::classify;
///
/// assert_eq!(classify("test_class.js").unwrap(), "TestClass");
/// assert_eq!(classify("sync/script_include/test_class.js").unwrap(), "TestClass");
/// ```
pub fn classify(file_name: &str) -> Result<String> {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name);
    let stem = base.split('.').next().unwrap_or_default();

    let name: String = stem
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect();

    if name.is_empty() {
        return Err(SyncError::InvalidName(file_name.to_string()));
    }
    Ok(name)
}

/// Lower snake_case form of a display name, used for local file names.
///
/// Word boundaries are a lowercase letter or digit followed by an uppercase
/// letter, and the last capital of an acronym followed by a lowercase letter.
/// Hyphens and whitespace become underscores, and runs of underscores
/// collapse to one.
///
/// # Example
/// ```
/// use snow_sync_core::naming::snake_case;
///
/// assert_eq!(snake_case("TestClass"), "test_class");
/// assert_eq!(snake_case("HTTPClient"), "http_client");
/// ```
pub fn snake_case(display_name: &str) -> String {
    let chars: Vec<char> = display_name.chars().collect();
    let mut out = String::with_capacity(display_name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == '_' || c.is_whitespace() {
            if !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let after_word = prev.is_lowercase() || prev.is_ascii_digit();
            let ends_acronym = prev.is_uppercase() && next.is_some_and(char::is_lowercase);
            if (after_word || ends_acronym) && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// File name a display name is materialized under, e.g. `test_class.js`.
pub fn script_file_name(display_name: &str) -> String {
    format!("{}.{}", snake_case(display_name), SCRIPT_EXTENSION)
}

/// Find the table entry a script file belongs to.
///
/// With a `table_key`, only that entry is considered (keys compare
/// ASCII case-insensitively because pushed paths are lowercased) and its
/// name must equal `classify(file_name)`. Without a key, the first entry in
/// map order whose name matches wins.
///
/// Returns the entry's canonical key alongside the entry.
pub fn resolve<'a>(
    table_map: &'a TableMap,
    table_key: Option<&str>,
    file_name: &str,
) -> Result<(&'a str, &'a TableEntry)> {
    let display_name = classify(file_name)?;
    let matches_name = |entry: &TableEntry| entry.name.as_deref() == Some(display_name.as_str());

    let found = match table_key {
        Some(key) => table_map
            .iter()
            .find(|(k, entry)| k.eq_ignore_ascii_case(key) && matches_name(*entry)),
        None => table_map.iter().find(|(_, entry)| matches_name(*entry)),
    };

    found
        .map(|(k, entry)| (k.as_str(), entry))
        .ok_or_else(|| match table_key {
            Some(key) => SyncError::not_found(format!(
                "no table entry '{key}' named '{display_name}' (from '{file_name}')"
            )),
            None => SyncError::not_found(format!(
                "no table entry named '{display_name}' (from '{file_name}')"
            )),
        })
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

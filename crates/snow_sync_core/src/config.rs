//! Configuration types for snow_sync.
//!
//! This module provides the [`Config`] struct which describes the remote
//! instance to talk to, the credentials used for it, and the table map of
//! records to keep in sync. Configuration is persisted as YAML (typically
//! `configs.yml` next to the `sync/` directory).
//!
//! # Key Configuration Fields
//!
//! - `conf_path`: Directory holding the configuration document, used to
//!   rewrite it in place when credentials are encoded
//! - `base_url`: Table API root, e.g. `https://dev.service-now.com/api/now/table/`
//! - `creds`: User, password and the `encoded` flag
//! - `table_map`: Table key → record to sync
//!
//! # Example
//!
//! ```ignore
//! use snow_sync_core::config::Config;
//! use snow_sync_core::fs::RealFileSystem;
//! use std::path::Path;
//!
//! let config = Config::load_from(&RealFileSystem, Path::new("configs.yml"))?;
//! for (key, entry) in &config.table_map {
//!     println!("{key}: {:?}", entry.name);
//! }
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};
use crate::fs::FileSystem;

/// File name used when a config was not loaded from disk.
pub const DEFAULT_CONFIG_FILE: &str = "configs.yml";

/// Table key → entry, iterated in declaration order.
pub type TableMap = IndexMap<String, TableEntry>;

/// `Config` holds everything a sync run needs to know about the remote instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory containing the configuration document
    #[serde(default, alias = "base_path")]
    pub conf_path: Option<String>,

    /// Root URL of the table API; table names are appended directly
    #[serde(default)]
    pub base_url: Option<String>,

    /// Instance credentials
    #[serde(default)]
    pub creds: Credentials,

    /// Records to sync, keyed by the local subdirectory name
    #[serde(default)]
    pub table_map: TableMap,

    /// File the config was loaded from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Username and password for Basic auth.
///
/// When `encoded` is set both values are base64 text and must be decoded
/// before use. The legacy key `encrypted` is read as `encoded`; when a
/// document carries both, `encoded` wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCredentials")]
pub struct Credentials {
    pub user: Option<String>,
    pub pass: Option<String>,
    pub encoded: bool,
}

#[derive(Deserialize)]
struct RawCredentials {
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    pass: Option<String>,
    #[serde(default)]
    encoded: Option<bool>,
    #[serde(default)]
    encrypted: Option<bool>,
}

impl From<RawCredentials> for Credentials {
    fn from(raw: RawCredentials) -> Self {
        Self {
            user: raw.user,
            pass: raw.pass,
            encoded: raw.encoded.or(raw.encrypted).unwrap_or(false),
        }
    }
}

/// One remote record tracked as a local script file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Display name; the local file is its snake_case form
    #[serde(default)]
    pub name: Option<String>,

    /// Remote table, e.g. `sys_script_include`
    #[serde(default)]
    pub table: Option<String>,

    /// Record id
    #[serde(default)]
    pub sys_id: Option<String>,

    /// Field holding the script body
    #[serde(default)]
    pub field: Option<String>,

    /// Last record fetched by a pull
    #[serde(skip)]
    pub response: Option<serde_json::Value>,

    /// Local content attached by the last push
    #[serde(skip)]
    pub modified: Option<String>,
}

impl TableEntry {
    /// Create an entry with all required fields set.
    pub fn new(
        name: impl Into<String>,
        table: impl Into<String>,
        sys_id: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            table: Some(table.into()),
            sys_id: Some(sys_id.into()),
            field: Some(field.into()),
            response: None,
            modified: None,
        }
    }

    /// Names of required fields that are unset.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.table.is_none() {
            missing.push("table");
        }
        if self.sys_id.is_none() {
            missing.push("sys_id");
        }
        if self.field.is_none() {
            missing.push("field");
        }
        missing
    }
}

impl Config {
    /// Create a config for `base_url` with plaintext credentials and no tables.
    pub fn new(
        conf_path: impl Into<String>,
        base_url: impl Into<String>,
        user: impl Into<String>,
        pass: impl Into<String>,
    ) -> Self {
        Self {
            conf_path: Some(conf_path.into()),
            base_url: Some(base_url.into()),
            creds: Credentials {
                user: Some(user.into()),
                pass: Some(pass.into()),
                encoded: false,
            },
            table_map: TableMap::new(),
            source: None,
        }
    }

    /// Add a table entry (builder pattern).
    pub fn with_table(mut self, key: impl Into<String>, entry: TableEntry) -> Self {
        self.table_map.insert(key.into(), entry);
        self
    }

    /// Load config from a YAML document.
    pub fn load_from<FS: FileSystem>(fs: &FS, path: &Path) -> Result<Self> {
        let contents = fs
            .read_to_string(path)
            .map_err(|e| SyncError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut config: Config = serde_yaml::from_str(&contents)?;
        config.source = Some(path.to_path_buf());
        log::debug!(
            "Loaded config from {} ({} table(s))",
            path.display(),
            config.table_map.len()
        );
        Ok(config)
    }

    /// Resolve a relative `conf_path` against `base`.
    ///
    /// Used when the config was found outside the working directory, so the
    /// backing document is looked up next to the loaded file.
    pub fn anchor_conf_path(&mut self, base: &Path) {
        let Some(conf_path) = self.conf_path.as_deref() else {
            return;
        };
        if Path::new(conf_path).is_relative() {
            let anchored = base.join(conf_path).to_string_lossy().into_owned();
            self.conf_path = Some(anchored);
        }
    }

    /// Location of the backing document that credential encoding rewrites.
    ///
    /// This is `conf_path` joined with the file name the config was loaded
    /// from, so a config loaded from `configs.yml` with `conf_path: ./`
    /// resolves to `./configs.yml` relative to the working directory.
    pub fn backing_path(&self) -> Option<PathBuf> {
        let conf_path = self.conf_path.as_deref()?;
        let file_name = self
            .source
            .as_deref()
            .and_then(Path::file_name)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Some(Path::new(conf_path).join(file_name))
    }

    /// Mutable access to an entry by exact key.
    pub fn entry_mut(&mut self, key: &str) -> Option<&mut TableEntry> {
        self.table_map.get_mut(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockFileSystem;

    const SAMPLE: &str = "\
conf_path: conf/
base_url: https://test.com/api/now/table/
creds:
  user: test-name
  pass: test-password
  encrypted: false
table_map:
  script_include:
    name: TestClass
    table: sys_script_include
    sys_id: xxxxxx-sysid-xxxxxx
    field: test-field
  business_rule:
    name: OnInsert
    table: sys_script
    sys_id: yyyyyy-sysid-yyyyyy
    field: script
";

    #[test]
    fn test_load_from_parses_document() {
        let fs = MockFileSystem::new().with_file("conf/test_configs.yml", SAMPLE);
        let config = Config::load_from(&fs, Path::new("conf/test_configs.yml")).unwrap();

        assert_eq!(config.conf_path.as_deref(), Some("conf/"));
        assert_eq!(
            config.base_url.as_deref(),
            Some("https://test.com/api/now/table/")
        );
        assert!(!config.creds.encoded);
        assert_eq!(config.creds.user.as_deref(), Some("test-name"));

        let entry = &config.table_map["script_include"];
        assert_eq!(entry.name.as_deref(), Some("TestClass"));
        assert_eq!(entry.field.as_deref(), Some("test-field"));
        assert!(entry.response.is_none());
    }

    #[test]
    fn test_table_map_keeps_declaration_order() {
        let fs = MockFileSystem::new().with_file("configs.yml", SAMPLE);
        let config = Config::load_from(&fs, Path::new("configs.yml")).unwrap();
        let keys: Vec<_> = config.table_map.keys().cloned().collect();
        assert_eq!(keys, vec!["script_include", "business_rule"]);
    }

    #[test]
    fn test_null_values_become_none() {
        let doc = "conf_path: ~\nbase_url: ~\ncreds:\n  user: ~\n  pass: x\ntable_map:\n  a:\n    name: A\n    table: ~\n";
        let fs = MockFileSystem::new().with_file("configs.yml", doc);
        let config = Config::load_from(&fs, Path::new("configs.yml")).unwrap();

        assert!(config.conf_path.is_none());
        assert!(config.base_url.is_none());
        assert!(config.creds.user.is_none());
        assert_eq!(
            config.table_map["a"].missing_fields(),
            vec!["table", "sys_id", "field"]
        );
    }

    #[test]
    fn test_backing_path_uses_source_file_name() {
        let fs = MockFileSystem::new().with_file("nested/test_configs.yml", SAMPLE);
        let config = Config::load_from(&fs, Path::new("nested/test_configs.yml")).unwrap();
        assert_eq!(
            config.backing_path(),
            Some(PathBuf::from("conf/test_configs.yml"))
        );

        let in_memory = Config::new("./", "https://x/", "u", "p");
        assert_eq!(in_memory.backing_path(), Some(PathBuf::from("./configs.yml")));
    }

    #[test]
    fn test_runtime_fields_are_not_serialized() {
        let mut config = Config::new("./", "https://x/", "u", "p").with_table(
            "script_include",
            TableEntry::new("TestClass", "sys_script_include", "id", "script"),
        );
        let entry = config.entry_mut("script_include").unwrap();
        entry.response = Some(serde_json::json!({ "script": "x" }));
        entry.modified = Some("y".to_string());

        let written = serde_yaml::to_string(&config).unwrap();
        assert!(!written.contains("response"));
        assert!(!written.contains("modified"));
        assert!(written.contains("sys_script_include"));
    }

    #[test]
    fn test_legacy_and_current_encoding_keys() {
        let legacy = "creds:\n  user: dXNlcg==\n  pass: cGFzcw==\n  encrypted: true\n";
        let both = "creds:\n  user: u\n  pass: p\n  encrypted: true\n  encoded: false\n";
        let fs = MockFileSystem::new()
            .with_file("legacy.yml", legacy)
            .with_file("both.yml", both);

        let config = Config::load_from(&fs, Path::new("legacy.yml")).unwrap();
        assert!(config.creds.encoded);

        let config = Config::load_from(&fs, Path::new("both.yml")).unwrap();
        assert!(!config.creds.encoded);
        assert_eq!(config.creds.user.as_deref(), Some("u"));
    }

    #[test]
    fn test_anchor_conf_path() {
        let mut config = Config::new("./", "https://x/", "u", "p");
        config.source = Some(PathBuf::from("/home/me/.config/snow_sync/configs.yml"));
        config.anchor_conf_path(Path::new("/home/me/.config/snow_sync"));
        assert_eq!(
            config.backing_path(),
            Some(PathBuf::from("/home/me/.config/snow_sync/./configs.yml"))
        );

        let mut absolute = Config::new("/etc/snow_sync", "https://x/", "u", "p");
        absolute.anchor_conf_path(Path::new("/elsewhere"));
        assert_eq!(absolute.conf_path.as_deref(), Some("/etc/snow_sync"));

        let mut unset = Config::default();
        unset.anchor_conf_path(Path::new("/elsewhere"));
        assert!(unset.conf_path.is_none());
    }

    #[test]
    fn test_load_missing_file_is_file_read_error() {
        let fs = MockFileSystem::new();
        let err = Config::load_from(&fs, Path::new("nope.yml")).unwrap_err();
        assert!(matches!(err, SyncError::FileRead { .. }));
    }
}

//! The sync engine: pull remote script fields into local files and push local
//! edits back.
//!
//! A [`SyncEngine`] owns the [`Config`] for the duration of a run and threads
//! it through every operation. Pull and push are best-effort per item: each
//! table entry or file gets its own `Result`, failures are logged and
//! collected into a [`SyncReport`], and the remaining items still run.
//!
//! # Example
//!
//! ```ignore
//! use snow_sync_core::engine::SyncEngine;
//! use snow_sync_core::fs::RealFileSystem;
//! use snow_sync_core::transport::ReqwestTransport;
//!
//! let mut engine = SyncEngine::new(config, RealFileSystem, ReqwestTransport::new());
//! let report = engine.run_full_sync()?;
//! println!("{} pulled, {} failed", report.succeeded.len(), report.failed.len());
//! ```

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::{Config, TableEntry};
use crate::credentials::{self, basic_auth_header, decode_for_use};
use crate::error::{RemoteError, Result, SyncError};
use crate::fs::FileSystem;
use crate::naming::{resolve, script_file_name};
use crate::notify::Notifier;
use crate::store::{DEFAULT_SYNC_DIR, LocalStore};
use crate::transport::{HttpRequest, HttpResponse, Transport};
use crate::validate;

const JSON: &str = "application/json";

/// Outcome of one pull or push batch.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Identifiers (`<table_key>/<file_name>`) that synced
    pub succeeded: Vec<String>,
    /// Items that failed, in processing order
    pub failed: Vec<FailedItem>,
}

/// A pull entry or pushed path that failed, with its error.
#[derive(Debug)]
pub struct FailedItem {
    pub item: String,
    pub error: SyncError,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of items attempted.
    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record(&mut self, item: String, outcome: Result<String>) {
        match outcome {
            Ok(id) => self.succeeded.push(id),
            Err(error) => {
                log::error!("ERROR: {item}: {error}");
                self.failed.push(FailedItem { item, error });
            }
        }
    }
}

/// Owned copy of an entry's required fields.
struct Target {
    name: String,
    table: String,
    sys_id: String,
    field: String,
}

impl Target {
    fn from_entry(key: &str, entry: &TableEntry) -> Result<Self> {
        match (&entry.name, &entry.table, &entry.sys_id, &entry.field) {
            (Some(name), Some(table), Some(sys_id), Some(field)) => Ok(Self {
                name: name.clone(),
                table: table.clone(),
                sys_id: sys_id.clone(),
                field: field.clone(),
            }),
            _ => Err(SyncError::Config {
                missing: entry
                    .missing_fields()
                    .into_iter()
                    .map(|field| format!("table_map.{key}.{field}"))
                    .collect(),
            }),
        }
    }
}

/// Drives pulls and pushes for one configuration.
pub struct SyncEngine<FS, T> {
    config: Config,
    store: LocalStore<FS>,
    transport: T,
    notifier: Option<Box<dyn Notifier>>,
}

impl<FS: FileSystem, T: Transport> SyncEngine<FS, T> {
    /// Create an engine syncing into `./sync`.
    pub fn new(config: Config, fs: FS, transport: T) -> Self {
        Self {
            config,
            store: LocalStore::new(fs, DEFAULT_SYNC_DIR),
            transport,
            notifier: None,
        }
    }

    /// Use a different sync root (builder pattern).
    pub fn with_sync_dir(self, root: impl Into<PathBuf>) -> Self {
        let Self {
            config,
            store,
            transport,
            notifier,
        } = self;
        let root = root.into();
        let fs = store.into_fs();
        Self {
            config,
            store: LocalStore::new(fs, root),
            transport,
            notifier,
        }
    }

    /// Notify `notifier` after pushes that updated at least one record.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    pub fn store(&self) -> &LocalStore<FS> {
        &self.store
    }

    /// Check that every required config item is present.
    pub fn validate(&self) -> Result<()> {
        validate::validate(&self.config)
    }

    /// Encode credentials at rest if they are still plaintext.
    pub fn encode_credentials(&mut self) -> Result<bool> {
        credentials::encode_once(&mut self.config, self.store.fs())
    }

    /// Validate, encode credentials once, then pull every entry.
    ///
    /// Validation and encoding failures abort the run before any request is
    /// made; per-entry pull failures are reported in the returned report.
    pub fn run_full_sync(&mut self) -> Result<SyncReport> {
        self.validate()?;
        self.encode_credentials()?;
        Ok(self.pull())
    }

    /// Fetch every configured record and write its script field locally.
    ///
    /// Entries are processed in table map order. A failed entry leaves its
    /// local file untouched.
    pub fn pull(&mut self) -> SyncReport {
        let mut report = SyncReport::default();
        let keys: Vec<String> = self.config.table_map.keys().cloned().collect();

        for key in keys {
            let outcome = self.pull_entry(&key);
            report.record(key, outcome);
        }

        log::debug!(
            "Pull finished: {} ok, {} failed",
            report.succeeded.len(),
            report.failed.len()
        );
        report
    }

    /// Push local script files back to their records, in the order given.
    ///
    /// Paths are compared case-insensitively and read as
    /// `<table_key>/<file_name>` from their last two components; a bare file
    /// name is matched by display name across all tables.
    pub fn push<P: AsRef<Path>>(&mut self, paths: &[P]) -> SyncReport {
        let mut report = SyncReport::default();

        for path in paths {
            let path = path.as_ref();
            let outcome = self.push_file(path);
            report.record(path.display().to_string(), outcome);
        }

        if !report.succeeded.is_empty()
            && let Some(notifier) = &self.notifier
        {
            notifier.notify(&report.succeeded);
        }
        report
    }

    fn pull_entry(&mut self, key: &str) -> Result<String> {
        let target = self.target(key)?;

        self.store.ensure_directory(self.store.root())?;
        self.store.ensure_directory(&self.store.table_dir(key))?;

        let url = format!(
            "{}{}?sysparm_query=sys_id%3D{}%5Ename%3D{}",
            self.base_url()?,
            target.table,
            urlencoding::encode(&target.sys_id),
            urlencoding::encode(&target.name)
        );
        let request = HttpRequest::get(url)
            .header("Authorization", self.auth_header()?)
            .header("Accept", JSON);
        let response = self.send(&request)?;

        let record = first_record(&response)?;
        let value = record.get(&target.field).cloned();
        if let Some(entry) = self.config.entry_mut(key) {
            entry.response = Some(record);
        }
        let content = match value {
            Some(Value::String(script)) => script,
            Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
            None => return Err(RemoteError::MissingField(target.field).into()),
        };

        self.store.write_script(key, &target.name, &content)?;
        Ok(format!("{key}/{}", script_file_name(&target.name)))
    }

    fn push_file(&mut self, path: &Path) -> Result<String> {
        let (table_key, file_name) = split_script_path(path)?;
        let (key, target) = {
            let (key, entry) =
                resolve(&self.config.table_map, table_key.as_deref(), &file_name)?;
            (key.to_string(), Target::from_entry(key, entry)?)
        };

        let content = self.store.read_script(&key, &file_name)?;
        if let Some(entry) = self.config.entry_mut(&key) {
            entry.modified = Some(content.clone());
        }

        let mut body = serde_json::Map::new();
        body.insert(target.field, Value::String(content));
        let body = serde_json::to_string(&Value::Object(body))?;

        let url = format!("{}{}/{}", self.base_url()?, target.table, target.sys_id);
        let request = HttpRequest::patch(url, body)
            .header("Authorization", self.auth_header()?)
            .header("Content-Type", JSON)
            .header("Accept", JSON);
        self.send(&request)?;

        log::info!("Pushed {key}/{file_name} to {}/{}", target.table, target.sys_id);
        Ok(format!("{key}/{file_name}"))
    }

    fn target(&self, key: &str) -> Result<Target> {
        let entry = self
            .config
            .table_map
            .get(key)
            .ok_or_else(|| SyncError::not_found(format!("table entry '{key}'")))?;
        Target::from_entry(key, entry)
    }

    fn base_url(&self) -> Result<&str> {
        self.config
            .base_url
            .as_deref()
            .ok_or_else(|| SyncError::Config {
                missing: vec!["base_url".to_string()],
            })
    }

    fn auth_header(&self) -> Result<String> {
        let decoded = decode_for_use(&self.config.creds)?;
        Ok(basic_auth_header(&decoded))
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let response = self.transport.send(request)?;
        if !response.is_success() {
            return Err(RemoteError::Status {
                status: response.status,
                body: response.body,
            }
            .into());
        }
        Ok(response)
    }
}

/// Split a pushed path into an optional table key and a file name, lowercased.
fn split_script_path(path: &Path) -> Result<(Option<String>, String)> {
    let normalized = PathBuf::from(path.to_string_lossy().to_lowercase());
    let file_name = normalized
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| SyncError::InvalidName(path.display().to_string()))?;
    let table_key = normalized
        .parent()
        .and_then(Path::file_name)
        .and_then(|n| n.to_str())
        .map(str::to_string);
    Ok((table_key, file_name))
}

/// First element of the response's `result` array.
fn first_record(response: &HttpResponse) -> Result<Value> {
    let body: Value = serde_json::from_str(&response.body).map_err(RemoteError::Parse)?;
    body.get("result")
        .and_then(Value::as_array)
        .and_then(|records| records.first())
        .cloned()
        .ok_or_else(|| RemoteError::EmptyResult.into())
}

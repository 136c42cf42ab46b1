use std::path::PathBuf;

use thiserror::Error;

/// Message fragment shared by every configuration error.
pub const CONFIG_HINT: &str =
    "Check the configuration path, base url, credentials or table to sync.";

/// Unified error type for snow_sync operations
#[derive(Debug, Error)]
pub enum SyncError {
    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // Config errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Required configs missing ({}). {}", .missing.join(", "), CONFIG_HINT)]
    Config { missing: Vec<String> },

    #[error("Invalid credentials: {0}")]
    CredentialDecode(String),

    // Identity errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cannot derive a display name from '{0}'")]
    InvalidName(String),

    // Remote errors
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures talking to the remote instance or interpreting its responses.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unparseable response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Response contained no records")]
    EmptyResult,

    #[error("Record has no field '{0}'")]
    MissingField(String),
}

/// Result type alias for snow_sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    /// Build a not-found error from any displayable subject.
    pub fn not_found(subject: impl Into<String>) -> Self {
        Self::NotFound(subject.into())
    }

    /// True for errors raised by the remote side of a pull or push.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

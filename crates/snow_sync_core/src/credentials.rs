//! Credential encoding at rest.
//!
//! Credentials start out as plaintext in the configuration document. The first
//! full sync rewrites them as base64 and sets `creds.encoded: true`, both in the
//! document and in the in-memory [`Config`]. From then on every consumer decodes
//! them right before building an `Authorization` header.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_yaml::{Mapping, Value};

use crate::config::{Config, Credentials};
use crate::error::{Result, SyncError};
use crate::fs::FileSystem;

/// Plaintext credentials, only ever held for the duration of a request.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedCredentials {
    pub user: String,
    pub pass: String,
}

impl std::fmt::Debug for DecodedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedCredentials")
            .field("user", &self.user)
            .field("pass", &"***")
            .finish()
    }
}

pub fn is_encoded(config: &Config) -> bool {
    config.creds.encoded
}

/// Encode the configured credentials once and persist the change.
///
/// Returns `Ok(false)` without touching anything when the credentials are
/// already encoded. Otherwise the whole backing document is reloaded, its
/// `creds` section is rewritten, the document is written back in one write,
/// and the same values are mirrored into `config`.
pub fn encode_once<FS: FileSystem>(config: &mut Config, fs: &FS) -> Result<bool> {
    if config.creds.encoded {
        log::debug!("Credentials already encoded");
        return Ok(false);
    }

    let (Some(user), Some(pass)) = (config.creds.user.as_deref(), config.creds.pass.as_deref())
    else {
        return Err(SyncError::Config {
            missing: missing_credentials(&config.creds),
        });
    };
    let user_b64 = STANDARD.encode(user);
    let pass_b64 = STANDARD.encode(pass);

    let path = config.backing_path().ok_or_else(|| SyncError::Config {
        missing: vec!["conf_path".to_string()],
    })?;
    let contents = fs
        .read_to_string(&path)
        .map_err(|e| SyncError::FileRead {
            path: path.clone(),
            source: e,
        })?;

    let mut document: Value = serde_yaml::from_str(&contents)?;
    let creds = document
        .as_mapping_mut()
        .map(|root| {
            root.entry(Value::from("creds"))
                .or_insert_with(|| Value::Mapping(Mapping::new()))
        })
        .and_then(|creds| {
            if creds.is_null() {
                *creds = Value::Mapping(Mapping::new());
            }
            creds.as_mapping_mut()
        })
        .ok_or_else(|| SyncError::Config {
            missing: vec!["creds".to_string()],
        })?;
    creds.insert(Value::from("user"), Value::from(user_b64.clone()));
    creds.insert(Value::from("pass"), Value::from(pass_b64.clone()));
    creds.remove("encrypted");
    creds.insert(Value::from("encoded"), Value::from(true));

    fs.write_file(&path, &serde_yaml::to_string(&document)?)
        .map_err(|e| SyncError::FileWrite {
            path: path.clone(),
            source: e,
        })?;
    log::info!("Encoded credentials in {}", path.display());

    config.creds.user = Some(user_b64);
    config.creds.pass = Some(pass_b64);
    config.creds.encoded = true;
    Ok(true)
}

/// Plaintext credentials for building a request.
pub fn decode_for_use(creds: &Credentials) -> Result<DecodedCredentials> {
    let (Some(user), Some(pass)) = (creds.user.as_deref(), creds.pass.as_deref()) else {
        return Err(SyncError::Config {
            missing: missing_credentials(creds),
        });
    };

    if !creds.encoded {
        return Ok(DecodedCredentials {
            user: user.to_string(),
            pass: pass.to_string(),
        });
    }

    Ok(DecodedCredentials {
        user: decode_value("user", user)?,
        pass: decode_value("pass", pass)?,
    })
}

/// `Authorization` header value for HTTP Basic auth.
pub fn basic_auth_header(creds: &DecodedCredentials) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", creds.user, creds.pass))
    )
}

fn decode_value(label: &str, value: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(value)
        .map_err(|e| SyncError::CredentialDecode(format!("{label}: {e}")))?;
    String::from_utf8(bytes).map_err(|e| SyncError::CredentialDecode(format!("{label}: {e}")))
}

fn missing_credentials(creds: &Credentials) -> Vec<String> {
    let mut missing = Vec::new();
    if creds.user.is_none() {
        missing.push("creds.user".to_string());
    }
    if creds.pass.is_none() {
        missing.push("creds.pass".to_string());
    }
    missing
}

//! Optional keystore credentials source (key.properties)
//!
//! Loads the properties-style credentials file from the project root.
//! The file is optional: absence is the normal state for local and
//! debug-only workflows. A file that exists but cannot be parsed is a
//! fatal configuration error, surfaced before any variant settings are
//! computed.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Well-known credentials file name, relative to the project root.
pub const CREDENTIALS_FILE: &str = "key.properties";

/// Key for the signing key alias.
pub const KEY_ALIAS: &str = "keyAlias";

/// Key for the signing key password.
pub const KEY_PASSWORD: &str = "keyPassword";

/// Key for the keystore password.
pub const STORE_PASSWORD: &str = "storePassword";

/// Key for the keystore file path, relative to the project root.
pub const STORE_FILE: &str = "storeFile";

/// Errors from loading the credentials file
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("failed to read credentials file: {0}")]
    Io(#[from] io::Error),

    #[error("malformed credentials file at line {line}: no key/value separator in {text:?}")]
    Malformed { line: usize, text: String },
}

/// Parsed credentials file with provenance
///
/// Read once at resolution time and immutable afterwards. Entries hold
/// secrets; the source itself is never serialized.
#[derive(Debug, Clone)]
pub struct CredentialsSource {
    /// Source file path as given to [`CredentialsSource::load`]
    pub path: String,

    /// SHA-256 digest of the raw file bytes (hex-encoded)
    pub digest: String,

    entries: BTreeMap<String, String>,
}

impl CredentialsSource {
    /// Load the credentials file if it exists.
    ///
    /// Returns `Ok(None)` when the file is absent. A file that exists but
    /// cannot be parsed is an error.
    pub fn load(path: &Path) -> Result<Option<Self>, CredentialsError> {
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(path)?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8_lossy(&bytes);
        let entries = parse_properties(&contents)?;

        Ok(Some(Self {
            path: path.to_string_lossy().to_string(),
            digest,
            entries,
        }))
    }

    /// Parse credentials from a properties string (no provenance).
    pub fn from_str(contents: &str) -> Result<Self, CredentialsError> {
        let mut hasher = Sha256::new();
        hasher.update(contents.as_bytes());

        Ok(Self {
            path: String::new(),
            digest: hex::encode(hasher.finalize()),
            entries: parse_properties(contents)?,
        })
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries in the source.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the source holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse line-oriented `key=value` properties.
///
/// Blank lines and lines starting with `#` or `!` are skipped. The first
/// `=` or `:` on a line separates key from value; both sides are trimmed
/// and later duplicates win. Escape sequences are not interpreted.
fn parse_properties(contents: &str) -> Result<BTreeMap<String, String>, CredentialsError> {
    let mut entries = BTreeMap::new();

    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let sep = line
            .find(['=', ':'])
            .ok_or_else(|| CredentialsError::Malformed {
                line: idx + 1,
                text: raw.to_string(),
            })?;

        let key = line[..sep].trim();
        if key.is_empty() {
            return Err(CredentialsError::Malformed {
                line: idx + 1,
                text: raw.to_string(),
            });
        }

        let value = line[sep + 1..].trim();
        entries.insert(key.to_string(), value.to_string());
    }

    Ok(entries)
}

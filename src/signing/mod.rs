//! Release signing configuration
//!
//! Builds the named signing configuration from the optional credentials
//! source. Missing keys leave fields unset at resolution time;
//! completeness is only checked when the material is actually needed,
//! via [`SigningConfig::material`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::credentials::{self, CredentialsSource};

/// Name of the single signing configuration assigned to release builds.
pub const RELEASE_SIGNING_NAME: &str = "release";

/// Errors from using a signing configuration
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("signing config {config:?} is missing required field {field:?}")]
    MissingMaterial { config: String, field: &'static str },
}

/// Signing configuration with optional fields
///
/// All fields are optional at resolution time. An inert configuration
/// (every field unset) is valid; it only becomes an error when signing
/// material is requested from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Configuration name (e.g. "release")
    pub name: String,

    /// Key alias inside the keystore
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,

    /// Password for the key entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_password: Option<String>,

    /// Password for the keystore itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_password: Option<String>,

    /// Absolute path to the keystore file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_file: Option<PathBuf>,
}

impl SigningConfig {
    /// Build from the optional credentials source.
    ///
    /// Each field is taken from its key when present; absent keys leave
    /// the field unset, with no defaults substituted. A relative
    /// `storeFile` value is resolved against the project root.
    pub fn from_credentials(
        name: &str,
        creds: Option<&CredentialsSource>,
        project_root: &Path,
    ) -> Self {
        let Some(creds) = creds else {
            return Self::inert(name);
        };

        Self {
            name: name.to_string(),
            key_alias: creds.get(credentials::KEY_ALIAS).map(str::to_string),
            key_password: creds.get(credentials::KEY_PASSWORD).map(str::to_string),
            store_password: creds.get(credentials::STORE_PASSWORD).map(str::to_string),
            store_file: creds
                .get(credentials::STORE_FILE)
                .map(|rel| resolve_store_file(project_root, Path::new(rel))),
        }
    }

    /// Configuration with every field unset.
    pub fn inert(name: &str) -> Self {
        Self {
            name: name.to_string(),
            key_alias: None,
            key_password: None,
            store_password: None,
            store_file: None,
        }
    }

    /// Whether no field is set.
    pub fn is_inert(&self) -> bool {
        self.key_alias.is_none()
            && self.key_password.is_none()
            && self.store_password.is_none()
            && self.store_file.is_none()
    }

    /// Use-time completeness check.
    ///
    /// Resolution never calls this; the signing step does. All four
    /// fields are required and the first unset one is reported.
    pub fn material(&self) -> Result<SigningMaterial<'_>, SigningError> {
        Ok(SigningMaterial {
            key_alias: self.require(self.key_alias.as_deref(), credentials::KEY_ALIAS)?,
            key_password: self.require(self.key_password.as_deref(), credentials::KEY_PASSWORD)?,
            store_password: self
                .require(self.store_password.as_deref(), credentials::STORE_PASSWORD)?,
            store_file: self
                .require(self.store_file.as_deref(), credentials::STORE_FILE)?,
        })
    }

    fn require<T>(&self, field: Option<T>, name: &'static str) -> Result<T, SigningError> {
        field.ok_or_else(|| SigningError::MissingMaterial {
            config: self.name.clone(),
            field: name,
        })
    }
}

/// Fully-populated view of a signing configuration
///
/// Only obtainable through [`SigningConfig::material`], so holding one
/// proves every required field was set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningMaterial<'a> {
    pub key_alias: &'a str,
    pub key_password: &'a str,
    pub store_password: &'a str,
    pub store_file: &'a Path,
}

/// Resolve a keystore path against the project root.
///
/// Absolute paths are kept as-is. The file is not required to exist
/// here; a dangling path fails at the signing step.
fn resolve_store_file(project_root: &Path, store_file: &Path) -> PathBuf {
    if store_file.is_absolute() {
        store_file.to_path_buf()
    } else {
        project_root.join(store_file)
    }
}

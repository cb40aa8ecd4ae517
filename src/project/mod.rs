//! Project manifest (apklane.toml)
//!
//! Supplies the application identity and platform version numbers. These
//! are pass-through values: the resolver records them as given and never
//! computes or adjusts them. Validation covers shape only.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Well-known manifest file name, relative to the project root.
pub const MANIFEST_FILE: &str = "apklane.toml";

/// Errors from loading the project manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("manifest validation error: {0}")]
    Validation(String),
}

/// Platform SDK version numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkVersions {
    /// Minimum supported platform version
    pub min: u32,

    /// Platform version the app targets
    pub target: u32,

    /// Platform version the app compiles against
    pub compile: u32,
}

/// Project manifest from apklane.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectManifest {
    /// Base application id (e.g. "com.example.app")
    pub application_id: String,

    /// Monotonic version code
    pub version_code: u32,

    /// Human-readable version name (e.g. "1.4.2")
    pub version_name: String,

    /// Platform versions, handed to the build step unmodified
    pub sdk: SdkVersions,
}

impl ProjectManifest {
    /// Load the manifest, returning it with the SHA-256 digest of the
    /// raw file bytes for provenance.
    pub fn load(path: &Path) -> Result<(Self, String), ManifestError> {
        let bytes = fs::read(path)?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8_lossy(&bytes);
        let manifest = Self::from_str(&contents)?;

        Ok((manifest, digest))
    }

    /// Parse a manifest from a TOML string.
    pub fn from_str(contents: &str) -> Result<Self, ManifestError> {
        let manifest: ProjectManifest = toml::from_str(contents)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate manifest shape.
    pub fn validate(&self) -> Result<(), ManifestError> {
        validate_application_id(&self.application_id)?;

        if self.version_code == 0 {
            return Err(ManifestError::Validation(
                "version_code must be greater than zero".to_string(),
            ));
        }

        if self.version_name.trim().is_empty() {
            return Err(ManifestError::Validation(
                "version_name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Validate an application id: two or more dot-separated identifier
/// segments, each starting with a letter.
fn validate_application_id(id: &str) -> Result<(), ManifestError> {
    let segments: Vec<&str> = id.split('.').collect();

    if segments.len() < 2 {
        return Err(ManifestError::Validation(format!(
            "application_id {:?} must have at least two dot-separated segments",
            id
        )));
    }

    for segment in segments {
        let mut chars = segment.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            None => false,
        };

        if !valid {
            return Err(ManifestError::Validation(format!(
                "application_id {:?} has invalid segment {:?}",
                id, segment
            )));
        }
    }

    Ok(())
}

//! Resolution of the per-variant build configuration
//!
//! One-shot computation: read the project manifest and the optional
//! credentials file, build the release signing configuration, and assign
//! settings to every variant. Serialized artifacts redact password
//! values; the in-memory value keeps them for the packaging step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::credentials::{self, CredentialsError, CredentialsSource};
use crate::project::{self, ManifestError, ProjectManifest, SdkVersions};
use crate::signing::{SigningConfig, RELEASE_SIGNING_NAME};
use crate::variant::{assign_variants, BuildVariant, VariantSettings};

/// Schema version for resolved_config.json
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "apk-lane/resolved_config@1";

/// Placeholder written over password values in serialized output
pub const REDACTED: &str = "[REDACTED]";

/// Errors from configuration resolution
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Credentials(#[from] CredentialsError),
}

/// Origin of a contributing source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    Manifest,
    Credentials,
}

/// A contributing source file with provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSource {
    /// Origin of this source
    pub origin: SourceOrigin,

    /// File path as read
    pub path: String,

    /// SHA-256 digest of the raw file bytes (hex-encoded)
    pub digest: String,
}

/// Resolved, variant-indexed build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedConfig {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// Base application id
    pub application_id: String,

    /// Version code, passed through from the manifest
    pub version_code: u32,

    /// Version name, passed through from the manifest
    pub version_name: String,

    /// Platform versions, passed through from the manifest
    pub sdk: SdkVersions,

    /// Settings per variant; total over the closed variant set
    pub variants: BTreeMap<BuildVariant, VariantSettings>,

    /// Contributing source files
    pub sources: Vec<ConfigSource>,

    /// Key paths redacted in serialized output (empty on the in-memory
    /// value)
    pub redactions: Vec<String>,
}

/// Everything the packaging step needs for one variant
#[derive(Debug, Clone)]
pub struct VariantBuildInputs<'a> {
    pub variant: BuildVariant,
    pub application_id: &'a str,
    pub version_code: u32,
    pub version_name: &'a str,
    pub sdk: SdkVersions,
    pub settings: &'a VariantSettings,
}

/// Resolve configuration for the project rooted at `project_root`.
///
/// Reads `apklane.toml` (required) and `key.properties` (optional). An
/// absent credentials file yields an inert release signing config; a
/// malformed one fails resolution before any variant settings exist.
pub fn resolve(project_root: &Path) -> Result<ResolvedConfig, ResolveError> {
    let manifest_path = project_root.join(project::MANIFEST_FILE);
    let (manifest, manifest_digest) = ProjectManifest::load(&manifest_path)?;

    let mut sources = vec![ConfigSource {
        origin: SourceOrigin::Manifest,
        path: manifest_path.to_string_lossy().to_string(),
        digest: manifest_digest,
    }];

    let credentials_path = project_root.join(credentials::CREDENTIALS_FILE);
    let creds = CredentialsSource::load(&credentials_path)?;
    if let Some(creds) = &creds {
        sources.push(ConfigSource {
            origin: SourceOrigin::Credentials,
            path: creds.path.clone(),
            digest: creds.digest.clone(),
        });
    }

    let signing = SigningConfig::from_credentials(RELEASE_SIGNING_NAME, creds.as_ref(), project_root);
    let variants = assign_variants(&manifest.application_id, &signing);

    Ok(ResolvedConfig {
        schema_version: SCHEMA_VERSION,
        schema_id: SCHEMA_ID.to_string(),
        created_at: Utc::now(),
        application_id: manifest.application_id,
        version_code: manifest.version_code,
        version_name: manifest.version_name,
        sdk: manifest.sdk,
        variants,
        sources,
        redactions: Vec::new(),
    })
}

impl ResolvedConfig {
    /// Settings for one variant.
    pub fn variant(&self, variant: BuildVariant) -> Option<&VariantSettings> {
        self.variants.get(&variant)
    }

    /// Per-variant inputs for the packaging step.
    pub fn build_inputs(&self, variant: BuildVariant) -> Option<VariantBuildInputs<'_>> {
        let settings = self.variants.get(&variant)?;
        Some(VariantBuildInputs {
            variant,
            application_id: &settings.application_id,
            version_code: self.version_code,
            version_name: &self.version_name,
            sdk: self.sdk,
            settings,
        })
    }

    /// Copy with password values replaced by [`REDACTED`], recording the
    /// redacted key paths.
    pub fn redacted(&self) -> Self {
        let mut out = self.clone();
        let mut redactions = Vec::new();

        for (variant, settings) in out.variants.iter_mut() {
            let Some(signing) = settings.signing.as_mut() else {
                continue;
            };
            if let Some(key_password) = signing.key_password.as_mut() {
                *key_password = REDACTED.to_string();
                redactions.push(format!("variants.{}.signing.key_password", variant));
            }
            if let Some(store_password) = signing.store_password.as_mut() {
                *store_password = REDACTED.to_string();
                redactions.push(format!("variants.{}.signing.store_password", variant));
            }
        }

        out.redactions = redactions;
        out
    }

    /// Serialize to pretty JSON with passwords redacted.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.redacted())
    }

    /// Write the redacted JSON artifact.
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("JSON error: {}", e))
        })?;
        fs::write(path, json)
    }
}

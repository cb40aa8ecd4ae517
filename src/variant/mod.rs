//! Build variants and fixed per-variant settings
//!
//! The variant set is closed: settings come from an exhaustive match, so
//! a new variant cannot be added without deciding its policy here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::signing::SigningConfig;

/// Identity suffix for debug builds.
///
/// Deliberately unset: debug artifacts keep the same application id as
/// release builds.
pub const DEBUG_APPLICATION_ID_SUFFIX: Option<&str> = None;

/// Closed set of build variants
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BuildVariant {
    Debug,
    Release,
}

impl BuildVariant {
    /// Every variant, in build order.
    pub const ALL: [BuildVariant; 2] = [BuildVariant::Debug, BuildVariant::Release];

    /// Lowercase variant name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildVariant::Debug => "debug",
            BuildVariant::Release => "release",
        }
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for variant names outside the closed set
#[derive(Debug, Error)]
#[error("unknown build variant {0:?} (expected \"debug\" or \"release\")")]
pub struct UnknownVariant(pub String);

impl FromStr for BuildVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(BuildVariant::Debug),
            "release" => Ok(BuildVariant::Release),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Resolved settings for one variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSettings {
    /// Final application id (base id plus suffix when one applies)
    pub application_id: String,

    /// Suffix appended to the base application id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id_suffix: Option<String>,

    /// Signing assignment (release only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing: Option<SigningConfig>,

    /// Whether code minification runs for this variant
    pub minify_enabled: bool,

    /// Whether unused resources are stripped for this variant
    pub shrink_resources: bool,
}

impl VariantSettings {
    /// Fixed settings policy for one variant.
    ///
    /// Not data-driven: debug is always unsigned with no identity
    /// suffix, release always carries the single signing configuration
    /// with minification and resource shrinking disabled.
    pub fn for_variant(
        variant: BuildVariant,
        application_id: &str,
        signing: &SigningConfig,
    ) -> Self {
        match variant {
            BuildVariant::Debug => Self {
                application_id: apply_suffix(application_id, DEBUG_APPLICATION_ID_SUFFIX),
                application_id_suffix: DEBUG_APPLICATION_ID_SUFFIX.map(str::to_string),
                signing: None,
                minify_enabled: false,
                shrink_resources: false,
            },
            BuildVariant::Release => Self {
                application_id: application_id.to_string(),
                application_id_suffix: None,
                signing: Some(signing.clone()),
                minify_enabled: false,
                shrink_resources: false,
            },
        }
    }
}

/// Assign settings to every variant in the closed set.
///
/// Total by construction: iterates [`BuildVariant::ALL`], so the result
/// always holds an entry per variant.
pub fn assign_variants(
    application_id: &str,
    signing: &SigningConfig,
) -> BTreeMap<BuildVariant, VariantSettings> {
    BuildVariant::ALL
        .iter()
        .map(|&variant| {
            (
                variant,
                VariantSettings::for_variant(variant, application_id, signing),
            )
        })
        .collect()
}

fn apply_suffix(base: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("{}{}", base, suffix),
        None => base.to_string(),
    }
}

//! apk-lane - Android build-variant configuration resolver
//!
//! Resolves per-variant build configuration for a packaged Android
//! application: application identity, platform version numbers, and the
//! release signing credentials sourced from an optional key.properties
//! file. The resolved configuration is consumed by a downstream
//! packaging step; debug builds are always left unsigned.

pub mod credentials;
pub mod project;
pub mod resolve;
pub mod signing;
pub mod variant;

pub use credentials::{CredentialsError, CredentialsSource};
pub use project::{ManifestError, ProjectManifest, SdkVersions};
pub use resolve::{resolve, ResolveError, ResolvedConfig};
pub use signing::{SigningConfig, SigningError, SigningMaterial};
pub use variant::{assign_variants, BuildVariant, VariantSettings};

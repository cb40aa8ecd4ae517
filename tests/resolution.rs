//! End-to-end resolution tests
//!
//! Exercise the full resolver against temporary project roots covering
//! the supported credentials states: absent, complete, partial, and
//! malformed.

use std::fs;
use std::path::Path;

use apk_lane::credentials::CredentialsError;
use apk_lane::resolve::{resolve, ResolveError, SourceOrigin, REDACTED, SCHEMA_ID};
use apk_lane::signing::SigningError;
use apk_lane::variant::BuildVariant;
use tempfile::TempDir;

const MANIFEST: &str = r#"
application_id = "com.studio.tae"
version_code = 12
version_name = "2.1.0"

[sdk]
min = 23
target = 35
compile = 35
"#;

fn project_root() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("apklane.toml"), MANIFEST).unwrap();
    dir
}

fn write_credentials(root: &Path, contents: &str) {
    fs::write(root.join("key.properties"), contents).unwrap();
}

#[test]
fn debug_is_unsigned_regardless_of_credentials() {
    let dir = project_root();
    write_credentials(
        dir.path(),
        "keyAlias=a\nkeyPassword=b\nstorePassword=c\nstoreFile=rel/path.jks\n",
    );

    let config = resolve(dir.path()).unwrap();

    let debug = config.variant(BuildVariant::Debug).unwrap();
    assert!(debug.signing.is_none());
    assert!(debug.application_id_suffix.is_none());
    assert_eq!(debug.application_id, "com.studio.tae");
}

#[test]
fn absent_credentials_resolve_to_inert_signing() {
    let dir = project_root();

    let config = resolve(dir.path()).unwrap();

    let release = config.variant(BuildVariant::Release).unwrap();
    let signing = release.signing.as_ref().unwrap();
    assert!(signing.is_inert());
    assert!(signing.key_alias.is_none());
    assert!(signing.key_password.is_none());
    assert!(signing.store_password.is_none());
    assert!(signing.store_file.is_none());

    // Only the manifest contributed
    assert_eq!(config.sources.len(), 1);
    assert_eq!(config.sources[0].origin, SourceOrigin::Manifest);
}

#[test]
fn full_credentials_round_trip_into_release_settings() {
    let dir = project_root();
    write_credentials(
        dir.path(),
        "keyAlias=a\nkeyPassword=b\nstorePassword=c\nstoreFile=rel/path.jks\n",
    );

    let config = resolve(dir.path()).unwrap();

    let release = config.variant(BuildVariant::Release).unwrap();
    let signing = release.signing.as_ref().unwrap();
    assert_eq!(signing.key_alias.as_deref(), Some("a"));
    assert_eq!(signing.key_password.as_deref(), Some("b"));
    assert_eq!(signing.store_password.as_deref(), Some("c"));

    let store_file = signing.store_file.as_deref().unwrap();
    assert!(store_file.is_absolute());
    assert!(store_file.ends_with("rel/path.jks"));

    assert_eq!(config.sources.len(), 2);
    assert_eq!(config.sources[1].origin, SourceOrigin::Credentials);
    assert_eq!(config.sources[1].digest.len(), 64);
}

#[test]
fn missing_store_file_defers_failure_to_use_time() {
    let dir = project_root();
    write_credentials(dir.path(), "keyAlias=a\nkeyPassword=b\nstorePassword=c\n");

    // Resolution itself succeeds
    let config = resolve(dir.path()).unwrap();

    let signing = config
        .variant(BuildVariant::Release)
        .unwrap()
        .signing
        .as_ref()
        .unwrap();
    assert_eq!(signing.key_alias.as_deref(), Some("a"));
    assert_eq!(signing.key_password.as_deref(), Some("b"));
    assert_eq!(signing.store_password.as_deref(), Some("c"));
    assert!(signing.store_file.is_none());

    // The failure only surfaces when signing material is requested
    match signing.material() {
        Err(SigningError::MissingMaterial { config, field }) => {
            assert_eq!(config, "release");
            assert_eq!(field, "storeFile");
        }
        other => panic!("expected MissingMaterial, got {:?}", other),
    }
}

#[test]
fn malformed_credentials_fail_before_variant_settings_exist() {
    let dir = project_root();
    write_credentials(dir.path(), "keyAlias\n");

    let result = resolve(dir.path());

    match result {
        Err(ResolveError::Credentials(CredentialsError::Malformed { line, text })) => {
            assert_eq!(line, 1);
            assert_eq!(text, "keyAlias");
        }
        other => panic!("expected malformed credentials error, got {:?}", other),
    }
}

#[test]
fn emitted_artifact_is_redacted_and_reparsable() {
    let dir = project_root();
    write_credentials(
        dir.path(),
        "keyAlias=a\nkeyPassword=secret-kp\nstorePassword=secret-sp\nstoreFile=k.jks\n",
    );

    let config = resolve(dir.path()).unwrap();
    let out = dir.path().join("resolved_config.json");
    config.write_to_file(&out).unwrap();

    let json = fs::read_to_string(&out).unwrap();
    assert!(!json.contains("secret-kp"));
    assert!(!json.contains("secret-sp"));

    let parsed: apk_lane::ResolvedConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.schema_id, SCHEMA_ID);
    assert_eq!(parsed.variants.len(), 2);

    let release = parsed.variant(BuildVariant::Release).unwrap();
    let signing = release.signing.as_ref().unwrap();
    assert_eq!(signing.key_password.as_deref(), Some(REDACTED));
    assert_eq!(signing.key_alias.as_deref(), Some("a"));
    assert!(parsed
        .redactions
        .contains(&"variants.release.signing.key_password".to_string()));
}

#[test]
fn version_numbers_pass_through_unmodified() {
    let dir = project_root();

    let config = resolve(dir.path()).unwrap();

    assert_eq!(config.version_code, 12);
    assert_eq!(config.version_name, "2.1.0");
    assert_eq!(config.sdk.min, 23);
    assert_eq!(config.sdk.target, 35);
    assert_eq!(config.sdk.compile, 35);

    let inputs = config.build_inputs(BuildVariant::Release).unwrap();
    assert_eq!(inputs.version_code, 12);
    assert_eq!(inputs.sdk.target, 35);
}

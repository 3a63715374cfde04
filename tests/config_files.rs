//! Loading field settings from disk and using them end to end

use std::io::Write;

use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;
use typed_link::{
    input_state, normalize, validate, AllowedKinds, ConfigError, FieldConfig, KindRegistry,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_yaml_field_settings() {
    init_tracing();
    let file = write_config(
        r#"
allowCustomText: true
allowedLinkNames:
  - entry
  - url
allowTarget: true
defaultLinkName: entry
defaultText: Learn more
typeSettings:
  entry:
    sources: ["section:news"]
"#,
    );

    let config = FieldConfig::load_from_file(file.path()).unwrap();

    assert_eq!(config.allowed_kinds, AllowedKinds::only(["entry", "url"]));
    assert_eq!(config.default_kind, "entry");

    let registry = KindRegistry::builtin().unwrap();
    let entry = registry.get("entry").unwrap();
    let settings = config.effective_kind_settings("entry", entry.as_ref());
    assert_eq!(settings["sources"], serde_json::json!(["section:news"]));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = FieldConfig::load_from_file("/nonexistent/field.yaml");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_malformed_yaml_is_reported() {
    let file = write_config("allowTarget: [not, a, bool");

    let result = FieldConfig::load_from_file(file.path());

    let err = result.unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
    assert!(err.to_string().starts_with("YAML error"));
}

#[test]
fn test_configured_field_end_to_end() {
    init_tracing();
    let file = write_config("allowedLinkNames: email\ndefaultText: Write to us\n");
    let config = FieldConfig::load_from_file(file.path()).unwrap();
    let registry = KindRegistry::builtin().unwrap();

    let link = normalize(
        serde_json::json!({"type": "email", "email": "hello@example.com"}),
        &config,
        &registry,
    );

    assert!(validate(&link, &config, &registry).is_empty());
    assert_eq!(link.text(), Some("Write to us"));
    assert_eq!(link.url(&registry).as_deref(), Some("mailto:hello@example.com"));

    let state = input_state(&link, &config, &registry);
    assert_eq!(state.single_kind.as_deref(), Some("email"));
    assert_eq!(state.kind.as_deref(), Some("email"));
}

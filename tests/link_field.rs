//! Integration tests for normalizing and validating link field values

use std::sync::Arc;

use serde_json::{json, Map, Value};
use typed_link::{
    normalize, validate, AllowedKinds, FieldConfig, KindHandler, KindRegistry, LinkNormalizer,
    RawInput, ValidationError,
};

/// Accepts any bare string as a URL, rejects anything without a scheme
struct FakeUrl;

impl KindHandler for FakeUrl {
    fn display_name(&self) -> &str {
        "URL"
    }

    fn normalize_value(&self, raw: Option<&Value>) -> Option<Value> {
        raw.and_then(Value::as_str).map(|s| Value::String(s.to_string()))
    }

    fn is_valid(&self, value: &Value, _settings: &Map<String, Value>) -> bool {
        value.as_str().is_some_and(|s| s.contains("://"))
    }
}

fn fake_registry() -> KindRegistry {
    let mut registry = KindRegistry::new();
    registry.register("url", Arc::new(FakeUrl));
    registry.register("email", Arc::new(typed_link::InputKind::email().unwrap()));
    registry
}

fn scenario_config() -> FieldConfig {
    FieldConfig::default()
        .with_custom_text(true)
        .with_target(false)
        .with_default_text("")
}

fn raw_inputs() -> Vec<RawInput> {
    vec![
        RawInput::from(r#"{"type":"url","value":"https://example.com","customText":"Click","target":true}"#),
        RawInput::from(r#"{"type":"email","value":"a@example.com"}"#),
        RawInput::from("not json"),
        RawInput::from(json!({"type": "url", "url": "bad", "customText": "Here"})),
        RawInput::from(json!({"type": "email", "email": " b@example.com ", "target": "1"})),
        RawInput::from(json!({"type": "gopher"})),
        RawInput::from(json!(17)),
        RawInput::Other(Value::Null),
    ]
}

fn configs() -> Vec<FieldConfig> {
    vec![
        FieldConfig::default(),
        FieldConfig::default().with_allowed_kinds(AllowedKinds::only(["email"])),
        FieldConfig::default().with_custom_text(false).with_target(true),
        FieldConfig::default()
            .with_allowed_kinds(AllowedKinds::only(["url", "gopher"]))
            .with_default_text("Read more"),
    ]
}

#[test]
fn test_scenario_a_stored_url() {
    let registry = fake_registry();
    let config = scenario_config();

    let link = normalize(
        r#"{"type":"url","value":"https://example.com","customText":"Click"}"#,
        &config,
        &registry,
    );

    assert_eq!(link.kind(), Some("url"));
    assert_eq!(link.value(), Some(&json!("https://example.com")));
    assert_eq!(link.custom_text(), Some("Click"));
    assert_eq!(link.open_in_new_target(), None);
    assert!(!link.is_empty());
    assert!(validate(&link, &config, &registry).is_empty());
}

#[test]
fn test_scenario_b_kind_not_allowed() {
    let registry = fake_registry();
    let config = scenario_config().with_allowed_kinds(AllowedKinds::only(["email"]));

    let link = normalize(
        r#"{"type":"url","value":"https://example.com","customText":"Click"}"#,
        &config,
        &registry,
    );

    assert_eq!(link.kind(), None);
    assert_eq!(link.value(), None);
    assert_eq!(link.custom_text(), Some("Click"));
    assert_eq!(link.open_in_new_target(), None);
}

#[test]
fn test_scenario_c_unparseable_payload() {
    let registry = fake_registry();
    let config = scenario_config().with_default_text("Read more");

    let link = normalize("not json", &config, &registry);

    assert_eq!(link.kind(), None);
    assert_eq!(link.value(), None);
    assert_eq!(link.custom_text(), None);
    assert_eq!(link.text(), Some("Read more"));
    assert_eq!(link.open_in_new_target(), None);
    assert!(link.is_empty());
    assert!(validate(&link, &config, &registry).is_empty());
}

#[test]
fn test_scenario_d_link_passes_through() {
    let registry = fake_registry();
    let config = scenario_config();
    let normalizer = LinkNormalizer::new(&config, &registry);

    let link = normalizer.normalize(r#"{"type":"url","value":"https://example.com"}"#);
    let again = normalizer.normalize(link.clone());

    assert_eq!(again, link);
}

#[test]
fn test_scenario_e_handler_rejects_value() {
    let registry = fake_registry();
    let config = scenario_config();

    let link = normalize(json!({"type": "url", "url": "bad"}), &config, &registry);

    assert_eq!(link.kind(), Some("url"));
    assert_eq!(link.value(), Some(&json!("bad")));
    assert_eq!(
        validate(&link, &config, &registry),
        vec![ValidationError::InvalidValue {
            kind: "url".to_string()
        }]
    );
}

#[test]
fn test_normalize_is_idempotent() {
    let registry = fake_registry();

    for config in configs() {
        for raw in raw_inputs() {
            let once = normalize(raw, &config, &registry);
            let twice = normalize(once.clone(), &config, &registry);
            assert_eq!(twice, once);
        }
    }
}

#[test]
fn test_stored_form_reads_back_the_same() {
    let registry = fake_registry();

    for config in configs() {
        for raw in raw_inputs() {
            let link = normalize(raw, &config, &registry);
            let stored = link.to_storage_string().unwrap();
            assert_eq!(normalize(stored, &config, &registry), link);
        }
    }
}

#[test]
fn test_disallowed_kinds_never_survive() {
    let registry = fake_registry();

    for config in configs() {
        let allowed = config.allowed_kinds(&registry);
        for raw in raw_inputs() {
            let link = normalize(raw, &config, &registry);
            if let Some(kind) = link.kind() {
                assert!(allowed.contains_key(kind), "kind {} leaked through", kind);
            } else {
                assert_eq!(link.value(), None);
            }
        }
    }
}

#[test]
fn test_wildcard_allows_whole_registry() {
    let registry = fake_registry();
    let allowed = FieldConfig::default().allowed_kinds(&registry);

    assert_eq!(
        allowed.keys().collect::<Vec<_>>(),
        registry.list_kinds().keys().collect::<Vec<_>>()
    );
}

#[test]
fn test_custom_text_never_taken_when_disallowed() {
    let registry = fake_registry();
    let config = FieldConfig::default().with_custom_text(false);

    for raw in raw_inputs() {
        assert_eq!(normalize(raw, &config, &registry).custom_text(), None);
    }
}

#[test]
fn test_empty_links_always_validate() {
    let registry = fake_registry();

    for config in configs() {
        for raw in raw_inputs() {
            let link = normalize(raw, &config, &registry);
            if link.is_empty() {
                assert!(validate(&link, &config, &registry).is_empty());
            }
        }
    }
}

#[test]
fn test_late_registration_is_observed() {
    let mut registry = fake_registry();
    let config = FieldConfig::default();

    let before = normalize(json!({"type": "site", "site": "/about"}), &config, &registry);
    assert_eq!(before.kind(), None);

    registry.register("site", Arc::new(typed_link::InputKind::new("Site path")));

    let after = normalize(json!({"type": "site", "site": "/about"}), &config, &registry);
    assert_eq!(after.kind(), Some("site"));
    assert_eq!(after.value(), Some(&json!("/about")));
}

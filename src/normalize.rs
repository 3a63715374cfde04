//! Normalization of raw field input into a [`LinkValue`].
//!
//! Raw input arrives in one of three shapes: an already normalized link, the
//! stored JSON payload, or the structured data posted by an edit form.
//! Anything else normalizes to a link holding only the field defaults.
//!
//! Normalization never fails. Payloads that cannot be parsed degrade to "no
//! kind, no value", and a kind the field does not allow is cleared together
//! with its value.

use serde_json::{Map, Value};

use crate::config::FieldConfig;
use crate::link::{LinkAttributes, LinkValue, StoredLink};
use crate::registry::KindRegistry;

/// Raw input accepted by the normalizer
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Already normalized, returned as is
    Link(LinkValue),
    /// Stored JSON payload
    Serialized(String),
    /// Posted form data: `type`, `customText`, `target` and one sub-payload per kind
    Structured(Map<String, Value>),
    /// Any other input (null, numbers, ...)
    Other(Value),
}

impl From<LinkValue> for RawInput {
    fn from(link: LinkValue) -> Self {
        RawInput::Link(link)
    }
}

impl From<&str> for RawInput {
    fn from(payload: &str) -> Self {
        RawInput::Serialized(payload.to_string())
    }
}

impl From<String> for RawInput {
    fn from(payload: String) -> Self {
        RawInput::Serialized(payload)
    }
}

impl From<Map<String, Value>> for RawInput {
    fn from(data: Map<String, Value>) -> Self {
        RawInput::Structured(data)
    }
}

impl From<Value> for RawInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(payload) => RawInput::Serialized(payload),
            Value::Object(data) => RawInput::Structured(data),
            other => RawInput::Other(other),
        }
    }
}

impl<T: Into<RawInput>> From<Option<T>> for RawInput {
    fn from(raw: Option<T>) -> Self {
        raw.map_or(RawInput::Other(Value::Null), Into::into)
    }
}

/// Normalizes input for one field against a kind registry
#[derive(Debug, Clone, Copy)]
pub struct LinkNormalizer<'a> {
    config: &'a FieldConfig,
    registry: &'a KindRegistry,
}

impl<'a> LinkNormalizer<'a> {
    /// Bind a field's settings to the registry in use
    pub fn new(config: &'a FieldConfig, registry: &'a KindRegistry) -> Self {
        Self { config, registry }
    }

    /// Normalize raw input into a link value.
    ///
    /// # Example
    ///
    /// ```
    /// use typed_link::{FieldConfig, KindRegistry, LinkNormalizer};
    ///
    /// let registry = KindRegistry::builtin().unwrap();
    /// let config = FieldConfig::default();
    /// let normalizer = LinkNormalizer::new(&config, &registry);
    ///
    /// let link = normalizer.normalize(r#"{"type":"url","value":"https://example.com"}"#);
    /// assert_eq!(link.kind(), Some("url"));
    /// ```
    pub fn normalize(&self, raw: impl Into<RawInput>) -> LinkValue {
        let mut attrs = LinkAttributes {
            allow_custom_text: self.config.allow_custom_text,
            allow_target: self.config.allow_target,
            default_text: self.config.default_text.clone(),
            ..Default::default()
        };

        match raw.into() {
            RawInput::Link(link) => return link,
            RawInput::Serialized(payload) => self.read_stored(&payload, &mut attrs),
            RawInput::Structured(data) => self.read_posted(&data, &mut attrs),
            RawInput::Other(_) => {}
        }

        if let Some(kind) = attrs.kind.as_deref() {
            if !self.config.is_allowed_kind(kind, self.registry) {
                tracing::debug!("Clearing link of kind '{}': not allowed on this field", kind);
                attrs.kind = None;
                attrs.value = None;
            }
        }

        LinkValue::new(attrs)
    }

    fn read_stored(&self, payload: &str, attrs: &mut LinkAttributes) {
        let stored = match serde_json::from_str::<Value>(payload) {
            Ok(object @ Value::Object(_)) => serde_json::from_value::<StoredLink>(object).unwrap_or_default(),
            Ok(_) => StoredLink::default(),
            Err(e) => {
                tracing::debug!("Unreadable link payload, using field defaults: {}", e);
                StoredLink::default()
            }
        };

        attrs.custom_text = self.gated_text(stored.custom_text.as_ref());
        attrs.open_in_new_target = self.gated_target(stored.target.as_ref());
        attrs.kind = kind_name(stored.kind.as_ref());
        attrs.value = stored.value.filter(|value| !is_blank(value));
    }

    fn read_posted(&self, data: &Map<String, Value>, attrs: &mut LinkAttributes) {
        attrs.custom_text = self.gated_text(data.get("customText"));
        attrs.open_in_new_target = self.gated_target(data.get("target"));
        attrs.kind = kind_name(data.get("type"));
        attrs.value = attrs.kind.as_deref().and_then(|kind| match self.registry.get(kind) {
            Some(handler) => handler.normalize_value(data.get(kind)),
            None => {
                tracing::debug!("No handler registered for link kind '{}'", kind);
                None
            }
        });
    }

    fn gated_text(&self, raw: Option<&Value>) -> Option<String> {
        if !self.config.allow_custom_text {
            return None;
        }
        match raw? {
            Value::String(text) => Some(text.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn gated_target(&self, raw: Option<&Value>) -> Option<bool> {
        if !self.config.allow_target {
            return None;
        }
        flag(raw?)
    }
}

/// Normalize `raw` for a field; see [`LinkNormalizer::normalize`]
pub fn normalize(raw: impl Into<RawInput>, config: &FieldConfig, registry: &KindRegistry) -> LinkValue {
    LinkNormalizer::new(config, registry).normalize(raw)
}

fn kind_name(raw: Option<&Value>) -> Option<String> {
    raw.and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

// Form posts send checkboxes as "1"/"" while stored payloads hold booleans
fn flag(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|n| n != 0.0)),
        Value::String(s) => Some(!matches!(s.trim(), "" | "0" | "false")),
        _ => None,
    }
}

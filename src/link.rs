//! The canonical link value.

use serde::ser::{Serialize, Serializer};
use serde::Deserialize;
use serde_json::Value;

use crate::registry::KindRegistry;

/// Attributes a [`LinkValue`] is built from.
///
/// The `allow_*` flags and `default_text` come from the field the value was
/// normalized under; the rest come from the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkAttributes {
    pub kind: Option<String>,
    pub value: Option<Value>,
    pub custom_text: Option<String>,
    pub open_in_new_target: Option<bool>,
    pub allow_custom_text: bool,
    pub allow_target: bool,
    pub default_text: String,
}

/// A normalized link.
///
/// Built once from raw input and never changed afterwards; a different link
/// is a new value. A value without a kind never carries a payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkValue {
    attrs: LinkAttributes,
}

impl LinkValue {
    pub fn new(mut attrs: LinkAttributes) -> Self {
        if attrs.kind.is_none() || attrs.value.as_ref().is_some_and(Value::is_null) {
            attrs.value = None;
        }
        Self { attrs }
    }

    pub fn kind(&self) -> Option<&str> {
        self.attrs.kind.as_deref()
    }

    pub fn value(&self) -> Option<&Value> {
        self.attrs.value.as_ref()
    }

    pub fn custom_text(&self) -> Option<&str> {
        self.attrs.custom_text.as_deref()
    }

    pub fn open_in_new_target(&self) -> Option<bool> {
        self.attrs.open_in_new_target
    }

    pub fn default_text(&self) -> &str {
        &self.attrs.default_text
    }

    pub fn attributes(&self) -> &LinkAttributes {
        &self.attrs
    }

    /// A link is empty unless it has both a kind and a value
    pub fn is_empty(&self) -> bool {
        self.attrs.kind.is_none() || self.attrs.value.is_none()
    }

    /// Text to show for the link: the custom text when the field allows it,
    /// otherwise the field's default text.
    pub fn text(&self) -> Option<&str> {
        self.attrs
            .custom_text
            .as_deref()
            .filter(|text| self.attrs.allow_custom_text && !text.is_empty())
            .or_else(|| Some(self.attrs.default_text.as_str()).filter(|text| !text.is_empty()))
    }

    /// `target` attribute value for rendered anchors
    pub fn target_attribute(&self) -> Option<&'static str> {
        if self.attrs.allow_target && self.attrs.open_in_new_target == Some(true) {
            Some("_blank")
        } else {
            None
        }
    }

    /// Link target as produced by the kind's handler
    pub fn url(&self, registry: &KindRegistry) -> Option<String> {
        let handler = registry.get(self.kind()?)?;
        handler.url(self.value()?)
    }

    /// Serialize to the stored payload (`customText`, `target`, `type`, `value`)
    pub fn to_storage_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Stored form of a link. These four keys are the only ones read back.
#[derive(serde::Serialize, Deserialize, Debug, Default)]
pub(crate) struct StoredLink {
    #[serde(rename = "customText", default, skip_serializing_if = "Option::is_none")]
    pub custom_text: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Value>,
    #[serde(rename = "type", default)]
    pub kind: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
}

impl Serialize for LinkValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StoredLink {
            custom_text: self.attrs.custom_text.clone().map(Value::String),
            target: self.attrs.open_in_new_target.map(Value::Bool),
            kind: self.attrs.kind.clone().map(Value::String),
            value: self.attrs.value.clone(),
        }
        .serialize(serializer)
    }
}

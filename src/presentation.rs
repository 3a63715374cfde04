//! Input state handed to whatever renders the link editor.
//!
//! Nothing here is persisted; it only decides which kind an editor shows
//! first and which kinds it offers.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::config::FieldConfig;
use crate::link::LinkValue;
use crate::registry::KindRegistry;

/// What the link editor should display for one value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputState {
    /// Kind selected in the editor
    pub kind: Option<String>,
    /// Value pre-filled for the selected kind
    pub value: Option<Value>,
    /// Set when the field offers exactly one kind, so no kind picker is needed
    pub single_kind: Option<String>,
    /// Offered kinds and their display names, in registration order
    pub kind_names: IndexMap<String, String>,
}

/// Kind to preselect for an empty link, if the field names an allowed default
pub fn default_kind<'c>(link: &LinkValue, config: &'c FieldConfig, registry: &KindRegistry) -> Option<&'c str> {
    if !link.is_empty() || config.default_kind.is_empty() {
        return None;
    }

    config
        .is_allowed_kind(&config.default_kind, registry)
        .then_some(config.default_kind.as_str())
}

/// Work out the editor state for `link` under a field.
///
/// A stored kind that the field no longer offers is swapped for the first
/// offered kind with no value; an empty link then falls back to the field's
/// default kind.
pub fn input_state(link: &LinkValue, config: &FieldConfig, registry: &KindRegistry) -> InputState {
    let allowed = config.allowed_kinds(registry);

    let mut kind = link.kind().map(str::to_string);
    let mut value = link.value().cloned();

    if !kind.as_ref().is_some_and(|k| allowed.contains_key(k)) {
        if let Some(first) = allowed.keys().next() {
            kind = Some(first.clone());
            value = None;
        }
    }

    let empty = kind.is_none() || value.is_none();
    if empty && !config.default_kind.is_empty() && allowed.contains_key(&config.default_kind) {
        kind = Some(config.default_kind.clone());
    }

    let single_kind = if allowed.len() == 1 {
        allowed.keys().next().cloned()
    } else {
        None
    };

    let kind_names = allowed
        .iter()
        .map(|(name, handler)| (name.clone(), handler.display_name().to_string()))
        .collect();

    InputState {
        kind,
        value,
        single_kind,
        kind_names,
    }
}

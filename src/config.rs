//! Field configuration for link fields.
//!
//! A [`FieldConfig`] is owned by a field definition and shared by every value
//! normalized under that field. It is usually read from the field's stored
//! settings (YAML or JSON) using the same key names the settings form uses.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::kind::KindHandler;
use crate::registry::{KindMap, KindRegistry};

/// Error type for loading field configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Yaml(e) => write!(f, "YAML error: {}", e),
            ConfigError::Json(e) => write!(f, "JSON error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid field configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Which kinds a field accepts.
///
/// Serialized as `"*"` for every registered kind, or as a list of names.
/// A lone name other than `"*"` is read as a one-element list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AllowedKindsRepr", into = "AllowedKindsRepr")]
pub enum AllowedKinds {
    #[default]
    All,
    Only(IndexSet<String>),
}

impl AllowedKinds {
    /// Explicit set of kind names
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AllowedKinds::Only(names.into_iter().map(Into::into).collect())
    }

    /// Whether `name` passes this filter (registration is checked separately)
    pub fn contains(&self, name: &str) -> bool {
        match self {
            AllowedKinds::All => true,
            AllowedKinds::Only(names) => names.contains(name),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AllowedKindsRepr {
    One(String),
    Many(Vec<String>),
}

impl From<AllowedKindsRepr> for AllowedKinds {
    fn from(repr: AllowedKindsRepr) -> Self {
        match repr {
            AllowedKindsRepr::One(name) if name == "*" => AllowedKinds::All,
            AllowedKindsRepr::One(name) => AllowedKinds::only([name]),
            AllowedKindsRepr::Many(names) => AllowedKinds::only(names),
        }
    }
}

impl From<AllowedKinds> for AllowedKindsRepr {
    fn from(allowed: AllowedKinds) -> Self {
        match allowed {
            AllowedKinds::All => AllowedKindsRepr::One("*".to_string()),
            AllowedKinds::Only(names) => AllowedKindsRepr::Many(names.into_iter().collect()),
        }
    }
}

/// Settings of a single link field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldConfig {
    /// Editors may override the link text
    pub allow_custom_text: bool,

    #[serde(rename = "allowedLinkNames")]
    pub allowed_kinds: AllowedKinds,

    /// Editors may ask for the link to open in a new window
    pub allow_target: bool,

    /// Kind preselected for empty values; empty string means none
    #[serde(rename = "defaultLinkName")]
    pub default_kind: String,

    pub default_text: String,

    /// Per-kind overrides merged over each handler's default settings
    #[serde(rename = "typeSettings", deserialize_with = "kind_settings_map")]
    pub kind_settings: IndexMap<String, Map<String, Value>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KindSettingsRepr {
    Map(IndexMap<String, Map<String, Value>>),
    // Fields saved without overrides store an empty list
    List(Vec<Value>),
}

fn kind_settings_map<'de, D>(deserializer: D) -> Result<IndexMap<String, Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    match KindSettingsRepr::deserialize(deserializer)? {
        KindSettingsRepr::Map(settings) => Ok(settings),
        KindSettingsRepr::List(items) if items.is_empty() => Ok(IndexMap::new()),
        KindSettingsRepr::List(_) => Err(serde::de::Error::custom(
            "typeSettings must be a map of kind name to settings",
        )),
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            allow_custom_text: true,
            allowed_kinds: AllowedKinds::All,
            allow_target: false,
            default_kind: String::new(),
            default_text: String::new(),
            kind_settings: IndexMap::new(),
        }
    }
}

impl FieldConfig {
    /// Load field settings from a YAML file.
    ///
    /// # Example
    /// ```ignore
    /// use typed_link::FieldConfig;
    ///
    /// let config = FieldConfig::load_from_file("config/fields/cta_link.yaml")?;
    /// println!("Default kind: {}", config.default_kind);
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Parse field settings from YAML text
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.check()?;
        Ok(config)
    }

    /// Parse field settings from JSON text
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if let AllowedKinds::Only(names) = &self.allowed_kinds {
            if names.contains("*") {
                return Err(ConfigError::Invalid(
                    "'*' cannot be combined with explicit kind names".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Restrict which kinds the field accepts
    pub fn with_allowed_kinds(mut self, allowed_kinds: AllowedKinds) -> Self {
        self.allowed_kinds = allowed_kinds;
        self
    }

    /// Allow or forbid custom link text
    pub fn with_custom_text(mut self, allow: bool) -> Self {
        self.allow_custom_text = allow;
        self
    }

    /// Allow or forbid the open-in-new-window flag
    pub fn with_target(mut self, allow: bool) -> Self {
        self.allow_target = allow;
        self
    }

    /// Kind preselected for empty values
    pub fn with_default_kind(mut self, name: impl Into<String>) -> Self {
        self.default_kind = name.into();
        self
    }

    /// Text used when no custom text is given
    pub fn with_default_text(mut self, text: impl Into<String>) -> Self {
        self.default_text = text.into();
        self
    }

    /// Override settings for one kind
    pub fn with_kind_settings(mut self, name: impl Into<String>, settings: Map<String, Value>) -> Self {
        self.kind_settings.insert(name.into(), settings);
        self
    }

    /// Registered kinds this field accepts, in registration order.
    ///
    /// Recomputed on every call so handlers registered later are picked up.
    pub fn allowed_kinds(&self, registry: &KindRegistry) -> KindMap {
        registry
            .list_kinds()
            .iter()
            .filter(|(name, _)| self.allowed_kinds.contains(name))
            .map(|(name, handler)| (name.clone(), Arc::clone(handler)))
            .collect()
    }

    /// Whether `name` is both registered and accepted by this field
    pub fn is_allowed_kind(&self, name: &str, registry: &KindRegistry) -> bool {
        registry.has_kind(name) && self.allowed_kinds.contains(name)
    }

    /// Effective settings for one kind: the handler's defaults overlaid by this
    /// field's `typeSettings` entry for the kind.
    pub fn effective_kind_settings(&self, name: &str, handler: &dyn KindHandler) -> Map<String, Value> {
        let mut settings = handler.default_settings();
        if let Some(overrides) = self.kind_settings.get(name) {
            for (key, value) in overrides {
                settings.insert(key.clone(), value.clone());
            }
        }
        settings
    }
}

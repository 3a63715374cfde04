//! Kind handler trait and the built-in link kinds.
//!
//! A kind is one of the mutually exclusive targets a link can point at (a URL,
//! an email address, a reference to a stored element, ...). Each kind is
//! implemented by a [`KindHandler`] which knows how to turn its raw input
//! payload into a normalized value and how to check that value later on.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};

/// Settings key that switches off pattern validation for input kinds.
pub const DISABLE_VALIDATION: &str = "disableValidation";

/// Settings key listing the element sources a reference kind may select from.
pub const SOURCES: &str = "sources";

/// Error type for building kind handlers
#[derive(Debug, Clone)]
pub enum KindError {
    InvalidPattern {
        kind: String,
        source: regex::Error,
    },
}

impl fmt::Display for KindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindError::InvalidPattern { kind, source } => {
                write!(f, "Invalid validation pattern for kind '{}': {}", kind, source)
            }
        }
    }
}

impl std::error::Error for KindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KindError::InvalidPattern { source, .. } => Some(source),
        }
    }
}

/// Capability implemented once per link kind.
///
/// Handlers are stateless from the normalizer's point of view and must be
/// safe to share between threads, since a single registry serves every field.
///
/// # Example
///
/// ```
/// use serde_json::{Map, Value};
/// use typed_link::KindHandler;
///
/// struct Anchor;
///
/// impl KindHandler for Anchor {
///     fn display_name(&self) -> &str {
///         "Anchor"
///     }
///
///     fn normalize_value(&self, raw: Option<&Value>) -> Option<Value> {
///         raw.and_then(Value::as_str)
///             .map(|s| s.trim_start_matches('#'))
///             .filter(|s| !s.is_empty())
///             .map(|s| Value::String(s.to_string()))
///     }
///
///     fn is_valid(&self, value: &Value, _settings: &Map<String, Value>) -> bool {
///         value.as_str().is_some_and(|s| !s.contains(' '))
///     }
/// }
/// ```
pub trait KindHandler: Send + Sync {
    /// Human readable name shown when picking a kind
    fn display_name(&self) -> &str;

    /// Settings this kind uses when the field does not override them
    fn default_settings(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Normalize the raw per-kind payload.
    ///
    /// `raw` is the sub-payload stored under the kind's own name in structured
    /// input, or `None` when the input carried nothing for this kind.
    /// Returns `None` when the payload does not produce a value.
    fn normalize_value(&self, raw: Option<&Value>) -> Option<Value>;

    /// Check a normalized value against the kind's structural rules.
    ///
    /// `settings` are the effective settings for this kind on the owning field.
    fn is_valid(&self, value: &Value, settings: &Map<String, Value>) -> bool;

    /// Link target for a normalized value, if the kind can produce one
    fn url(&self, _value: &Value) -> Option<String> {
        None
    }
}

/// Kind whose value is a single line of user input (URL, email, phone, ...).
#[derive(Debug, Clone)]
pub struct InputKind {
    display_name: String,
    pattern: Option<Regex>,
    url_prefix: String,
}

impl InputKind {
    /// Free-form input kind accepting any non-empty text
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            pattern: None,
            url_prefix: String::new(),
        }
    }

    /// Input kind whose values must match `pattern`
    pub fn with_pattern(display_name: impl Into<String>, pattern: &str) -> Result<Self, KindError> {
        let display_name = display_name.into();
        let pattern = Regex::new(pattern).map_err(|source| KindError::InvalidPattern {
            kind: display_name.clone(),
            source,
        })?;

        Ok(Self {
            display_name,
            pattern: Some(pattern),
            url_prefix: String::new(),
        })
    }

    /// Prefix prepended to the value when building the link target (e.g. `mailto:`)
    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    /// Absolute URL with a scheme
    pub fn url() -> Result<Self, KindError> {
        Self::with_pattern("URL", r"^[a-zA-Z][a-zA-Z0-9+.\-]*://[^\s/?#]+[^\s]*$")
    }

    /// Email address, linked with `mailto:`
    pub fn email() -> Result<Self, KindError> {
        Ok(Self::with_pattern("Email", r"^[^\s@]+@[^\s@]+\.[^\s@]+$")?.with_url_prefix("mailto:"))
    }

    /// Phone number, linked with `tel:`
    pub fn tel() -> Result<Self, KindError> {
        Ok(Self::with_pattern("Telephone", r"^\+?[0-9][0-9 ()./\-]{2,}$")?.with_url_prefix("tel:"))
    }

    /// Free-form target such as a relative path or anchor
    pub fn custom() -> Self {
        Self::new("Custom")
    }
}

impl KindHandler for InputKind {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn default_settings(&self) -> Map<String, Value> {
        let mut settings = Map::new();
        settings.insert(DISABLE_VALIDATION.to_string(), Value::Bool(false));
        settings
    }

    fn normalize_value(&self, raw: Option<&Value>) -> Option<Value> {
        let text = match raw? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };

        if text.is_empty() {
            None
        } else {
            Some(Value::String(text))
        }
    }

    fn is_valid(&self, value: &Value, settings: &Map<String, Value>) -> bool {
        let Some(text) = value.as_str().filter(|s| !s.is_empty()) else {
            return false;
        };

        if settings.get(DISABLE_VALIDATION).and_then(Value::as_bool) == Some(true) {
            return true;
        }

        self.pattern.as_ref().map_or(true, |pattern| pattern.is_match(text))
    }

    fn url(&self, value: &Value) -> Option<String> {
        value.as_str().map(|s| format!("{}{}", self.url_prefix, s))
    }
}

/// Resolves a referenced element id to its public URL
pub type UrlResolver = Arc<dyn Fn(u64) -> Option<String> + Send + Sync>;

/// Kind whose value references a stored element (entry, asset, category) by id.
#[derive(Clone)]
pub struct ElementKind {
    display_name: String,
    resolver: Option<UrlResolver>,
}

impl ElementKind {
    /// Reference kind without URL lookup
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            resolver: None,
        }
    }

    /// Attach the host's lookup from element id to URL
    pub fn with_resolver(mut self, resolver: UrlResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }
}

impl fmt::Debug for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementKind")
            .field("display_name", &self.display_name)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

impl KindHandler for ElementKind {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn default_settings(&self) -> Map<String, Value> {
        let mut settings = Map::new();
        settings.insert(SOURCES.to_string(), Value::String("*".to_string()));
        settings
    }

    fn normalize_value(&self, raw: Option<&Value>) -> Option<Value> {
        match raw? {
            // Element selectors post a list of ids; only the first one counts
            Value::Array(ids) => self.normalize_value(ids.first()),
            Value::Number(n) => Some(Value::Number(n.clone())),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else if let Ok(id) = s.parse::<u64>() {
                    Some(Value::from(id))
                } else {
                    Some(Value::String(s.to_string()))
                }
            }
            _ => None,
        }
    }

    fn is_valid(&self, value: &Value, _settings: &Map<String, Value>) -> bool {
        element_id(value).is_some()
    }

    fn url(&self, value: &Value) -> Option<String> {
        let id = element_id(value)?;
        self.resolver.as_ref().and_then(|resolve| resolve(id))
    }
}

/// Positive element id held either as a number or as a numeric string
pub fn element_id(value: &Value) -> Option<u64> {
    let id = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    (id > 0).then_some(id)
}

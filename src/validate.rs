//! Field-level validation of normalized links.
//!
//! An empty link is always valid here; whether the field is required is the
//! host's concern. Errors are collected and returned, never raised.

use std::fmt;

use crate::config::FieldConfig;
use crate::link::LinkValue;
use crate::normalize::RawInput;
use crate::registry::KindRegistry;

/// A problem found with a link value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    KindNotAllowed { kind: String },
    InvalidValue { kind: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::KindNotAllowed { kind } => {
                write!(f, "Link kind '{}' is not allowed for this field", kind)
            }
            ValidationError::InvalidValue { kind } => {
                write!(f, "Invalid value for link kind '{}'", kind)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validates links for one field against a kind registry
#[derive(Debug, Clone, Copy)]
pub struct LinkValidator<'a> {
    config: &'a FieldConfig,
    registry: &'a KindRegistry,
}

impl<'a> LinkValidator<'a> {
    /// Bind a field's settings to the registry in use
    pub fn new(config: &'a FieldConfig, registry: &'a KindRegistry) -> Self {
        Self { config, registry }
    }

    /// Check a link and return every problem found (none when valid).
    pub fn validate(&self, link: &LinkValue) -> Vec<ValidationError> {
        let (Some(kind), Some(value)) = (link.kind(), link.value()) else {
            return Vec::new();
        };

        if !self.config.is_allowed_kind(kind, self.registry) {
            return vec![ValidationError::KindNotAllowed {
                kind: kind.to_string(),
            }];
        }

        let Some(handler) = self.registry.get(kind) else {
            return vec![ValidationError::KindNotAllowed {
                kind: kind.to_string(),
            }];
        };

        let settings = self.config.effective_kind_settings(kind, handler.as_ref());
        if handler.is_valid(value, &settings) {
            Vec::new()
        } else {
            vec![ValidationError::InvalidValue {
                kind: kind.to_string(),
            }]
        }
    }

    /// Whether `link` has no problems
    pub fn is_valid(&self, link: &LinkValue) -> bool {
        self.validate(link).is_empty()
    }
}

/// Validate `link` for a field; see [`LinkValidator::validate`]
pub fn validate(link: &LinkValue, config: &FieldConfig, registry: &KindRegistry) -> Vec<ValidationError> {
    LinkValidator::new(config, registry).validate(link)
}

/// Emptiness check for whatever the host holds as the field's value.
///
/// Only a link can be non-empty; every other input counts as empty.
pub fn is_empty_field_value(value: &RawInput) -> bool {
    match value {
        RawInput::Link(link) => link.is_empty(),
        _ => true,
    }
}

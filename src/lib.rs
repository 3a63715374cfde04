//! # Typed Link: Link Values for Content Fields
//!
//! A link field stores a value that points at one of several kinds of target
//! (an absolute URL, an email address, a phone number, a stored entry, ...),
//! optionally with custom link text and an "open in new window" flag. Each
//! field limits which kinds editors may pick.
//!
//! ## Features
//!
//! - **Kind registry**: Ordered, dependency-injected set of [`KindHandler`]s; hosts and plugins add their own kinds
//! - **Normalization**: Stored JSON payloads, posted form data or existing links become one canonical [`LinkValue`]
//! - **Fail closed**: Kinds a field does not allow are cleared together with their value
//! - **Validation**: Field-level [`ValidationError`]s for withdrawn kinds and malformed values
//! - **Field settings**: [`FieldConfig`] read from YAML or JSON using the settings form's key names
//!
//! ## Example
//!
//! ```
//! use typed_link::{normalize, validate, AllowedKinds, FieldConfig, KindRegistry};
//!
//! let registry = KindRegistry::builtin().unwrap();
//! let config = FieldConfig::default().with_allowed_kinds(AllowedKinds::only(["url", "email"]));
//!
//! let link = normalize(
//!     r#"{"type":"url","value":"https://example.com","customText":"Click"}"#,
//!     &config,
//!     &registry,
//! );
//!
//! assert_eq!(link.kind(), Some("url"));
//! assert_eq!(link.text(), Some("Click"));
//! assert!(validate(&link, &config, &registry).is_empty());
//! ```

// Core modules
pub mod kind;
pub mod registry;
pub mod config;
pub mod link;

// Normalization and validation pipeline
pub mod normalize;
pub mod validate;

// Editor state
pub mod presentation;

// Re-export key types
pub use kind::{element_id, ElementKind, InputKind, KindError, KindHandler, UrlResolver};
pub use registry::{KindMap, KindRegistry};
pub use config::{AllowedKinds, ConfigError, FieldConfig};
pub use link::{LinkAttributes, LinkValue};
pub use normalize::{normalize, LinkNormalizer, RawInput};
pub use validate::{is_empty_field_value, validate, LinkValidator, ValidationError};
pub use presentation::{default_kind, input_state, InputState};

//! # formkit-schema - Schema Model, Validation & Localization
//!
//! Everything formkit knows about the data-shape schema lives here. The
//! form layer consumes the model and the two pure transforms; it never
//! touches raw schema JSON itself.
//!
//! ## Schema Model (`model`)
//!
//! [`FormSchema::from_value`] interprets a JSON Schema document into an
//! immutable tree of [`SchemaNode`]s (object/array/string/boolean/number/
//! integer). Unsupported kinds, `required` names without a property and
//! arrays without `items` are rejected with [`SchemaError`].
//!
//! ## Validation (`validate`)
//!
//! [`JsonSchemaValidator`] compiles the raw schema with the `jsonschema`
//! crate (Draft 7) and turns every error into a [`RawViolation`]: instance
//! path, keyword, validator-native message and keyword parameters.
//!
//! ## Localization (`localize`)
//!
//! [`localize`] maps violations one-to-one onto [`LocalizedError`]s using a
//! per-[`Locale`] message table. Unknown keywords keep the native message.
//!
//! ## Documents (`document`)
//!
//! Schema, presentation and data files are JSON or YAML, chosen by
//! extension.
//!
//! [`SchemaError`]: formkit_core::SchemaError

pub mod document;
pub mod localize;
pub mod model;
pub mod validate;

// Re-export primary types.
pub use document::{load_document, parse_document, DocumentError, DocumentFormat};
pub use localize::{localize, Locale, LocalizedError};
pub use model::{FormSchema, Property, SchemaKind, SchemaNode};
pub use validate::{JsonSchemaValidator, RawViolation, ValidatorAdapter};

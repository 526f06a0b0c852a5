//! # formkit-core - Foundational Types for formkit
//!
//! This crate defines the primitives every other formkit crate speaks in.
//! It depends on nothing internal.
//!
//! ## Key Types
//!
//! 1. **`FieldPath`.** The location of a field in both the schema tree and
//!    the form value: a sequence of property names and array indices.
//!    Convertible to and from JSON Pointer, which is what validators report.
//!
//! 2. **Identity newtypes.** `ItemKey` (stable array item identity),
//!    `FieldId` (arena handle of a field controller) and `SessionId`.
//!    Positional indices are never used as identity.
//!
//! 3. **Error taxonomy.** `SchemaError` and `WidgetResolutionError` are
//!    build-time and fatal; `SessionError` covers lifecycle misuse;
//!    `SubmitRejected` is the recoverable signal from a submit handler.
//!    Validation violations are data, not errors, and do not appear here.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `formkit-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod path;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{FormkitError, SchemaError, SessionError, SubmitRejected, WidgetResolutionError};
pub use identity::{FieldId, ItemKey, ItemKeyAllocator, SessionId};
pub use path::{FieldPath, PathSegment};
pub use value::{remove_at, value_at, write_at};

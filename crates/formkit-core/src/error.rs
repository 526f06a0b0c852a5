//! # Error Types - Build-Time and Session Errors
//!
//! Defines the error types used throughout formkit. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Schema errors carry the JSON Pointer of the offending schema node.
//! - Widget resolution errors carry the field path and the widget name
//!   that could not be resolved.
//! - Session errors carry the current state and the attempted operation.
//! - Validation violations never appear here. They flow as data through
//!   the localizer onto the field tree.

use thiserror::Error;

/// Top-level error type for formkit.
#[derive(Error, Debug)]
pub enum FormkitError {
    /// The schema description is malformed.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A field requires a widget that no registry entry provides.
    #[error("widget resolution error: {0}")]
    WidgetResolution(#[from] WidgetResolutionError),

    /// A session operation was rejected.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

/// Error interpreting a data-shape schema. Fatal at build time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A node declares a `type` outside the supported set.
    #[error("unsupported kind '{kind}' at {pointer}")]
    UnsupportedKind {
        /// JSON Pointer of the schema node.
        pointer: String,
        /// The declared kind as written in the schema.
        kind: String,
    },

    /// An `array` node has no `items` sub-schema.
    #[error("array at {pointer} has no 'items' schema")]
    MissingItems {
        /// JSON Pointer of the array node.
        pointer: String,
    },

    /// A `required` entry names a property that is not declared.
    #[error("required property '{name}' at {pointer} is not declared in 'properties'")]
    UnknownRequired {
        /// JSON Pointer of the object node.
        pointer: String,
        /// The undeclared property name.
        name: String,
    },

    /// A schema keyword has the wrong JSON shape.
    #[error("malformed '{keyword}' at {pointer}: {reason}")]
    Malformed {
        /// JSON Pointer of the schema node.
        pointer: String,
        /// The offending keyword.
        keyword: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The validator could not compile the schema.
    #[error("schema could not be compiled: {reason}")]
    Compile {
        /// Reason reported by the validator.
        reason: String,
    },
}

/// No widget could be resolved for a field. Fatal at build time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no widget '{widget}' for {kind} field at {path}")]
pub struct WidgetResolutionError {
    /// Path of the field being built.
    pub path: String,
    /// The primitive kind of the field.
    pub kind: String,
    /// The widget name that was looked up.
    pub widget: String,
}

/// Error in form session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A validation pass is already running.
    #[error("a validation pass is already in flight")]
    ValidationInFlight,

    /// The operation is not allowed in the current state.
    #[error("cannot {operation} while session is {state}")]
    InvalidTransition {
        /// Current state name.
        state: String,
        /// Attempted operation.
        operation: String,
    },

    /// The session has been torn down.
    #[error("session has been torn down")]
    Disposed,

    /// The field handle does not refer to a live controller.
    #[error("unknown field {0}")]
    UnknownField(String),

    /// An array operation targeted a non-array field.
    #[error("field {0} is not an array")]
    NotAnArray(String),

    /// A value write targeted an object or array field.
    #[error("field {0} is not a leaf; write its children instead")]
    NotALeaf(String),

    /// A field built during the session has no resolvable widget.
    #[error(transparent)]
    Widget(#[from] WidgetResolutionError),
}

/// Rejection signalled by a submit handler (e.g. a server-side conflict).
///
/// Recoverable: the session returns to editing with all input preserved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("submission rejected: {reason}")]
pub struct SubmitRejected {
    /// Reason given by the handler.
    pub reason: String,
}

impl SubmitRejected {
    /// Create a rejection with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

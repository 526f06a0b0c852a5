//! # formkit-form - Schema-Driven Form Engine
//!
//! Turns a [`FormSchema`](formkit_schema::FormSchema), an optional
//! presentation overlay and an initial value into an editable session.
//!
//! ## Components
//!
//! - **Presentation hints** (`ui.rs`): sparse `ui:*` directives keyed like
//!   the schema.
//!
//! - **Widget registry** (`widget.rs`): overrides by exact name, then the
//!   built-in text, numeric, checkbox and select widgets.
//!
//! - **Field tree** (`builder.rs`, `tree.rs`, `field.rs`): one controller
//!   per rendered location, held in an arena addressed by
//!   [`FieldId`](formkit_core::FieldId). Array items carry stable
//!   [`ItemKey`](formkit_core::ItemKey)s that are never reused.
//!
//! - **Session** (`session.rs`): owns value, tree and registry; applies
//!   [`FormEvent`]s; runs the
//!   `Editing → Validating → Valid/Invalid → Submitted` lifecycle and routes
//!   localized errors to fields by JSON Pointer.
//!
//! - **Rendering** (`render/`): the [`Renderer`] capability the host
//!   implements, plus [`OutlineRenderer`] for plain text.
//!
//! ## Example
//!
//! ```
//! use formkit_form::{FormSession, OutlineRenderer, SubmitOutcome};
//! use formkit_schema::FormSchema;
//! use serde_json::json;
//!
//! let schema = FormSchema::from_value(json!({
//!     "type": "object",
//!     "required": ["nome"],
//!     "properties": {"nome": {"type": "string", "title": "Nome"}}
//! }))
//! .unwrap();
//! let mut session = FormSession::<String>::builder(schema).build().unwrap();
//!
//! let mut handler =
//!     |_: &serde_json::Value| -> Result<(), formkit_core::SubmitRejected> { Ok(()) };
//! let outcome = session.submit(&mut handler).unwrap();
//! assert!(matches!(outcome, SubmitOutcome::Invalid { .. }));
//!
//! let outline = session.render(&mut OutlineRenderer::new()).unwrap();
//! assert!(outline.contains("nome è obbligatorio"));
//! ```

pub mod builder;
pub mod config;
pub mod event;
pub mod field;
pub mod render;
pub mod session;
pub mod tree;
pub mod ui;
pub mod widget;

// Re-export primary types.
pub use builder::{fill_defaults, FieldTreeBuilder};
pub use config::FormConfig;
pub use event::FormEvent;
pub use field::{ArrayController, ArrayItem, Children, FieldController};
pub use render::{
    ArrayItemOutput, ArrayProps, FieldTemplateProps, ObjectProps, OutlineRenderer, Renderer,
    SubmitProps, WidgetProps,
};
pub use session::{
    FormSession, FormSessionBuilder, SessionState, SessionTransition, SubmitHandler,
    SubmitOutcome, ValidationOutcome, ValidationTicket,
};
pub use tree::FieldTree;
pub use ui::{UiOptions, UiSchema};
pub use widget::{
    BuiltinWidget, ResolvedWidget, Widget, WidgetRegistry, WidgetResolver, WidgetSource,
};

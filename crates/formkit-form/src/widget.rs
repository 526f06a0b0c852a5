//! # Widget Registry
//!
//! Resolves the rendering capability of every leaf field at build time.
//!
//! ## Resolution order
//!
//! 1. The widget name is the `ui:widget` hint, or the default name for
//!    the field's kind: `TextWidget` (string), `UpDownWidget`
//!    (number/integer), `CheckboxWidget` (boolean), `SelectWidget` (any
//!    primitive with `enum`).
//! 2. A caller-registered override with exactly that name wins.
//! 3. Short hint aliases (`text`, `updown`, `checkbox`, `select`) are
//!    expanded to the default names and checked against the overrides
//!    again.
//! 4. Otherwise a built-in widget with that name is used if it can edit
//!    the field's kind.
//!
//! Anything left unresolved is a [`WidgetResolutionError`], fatal at build
//! time. Registering an override under a default name (e.g.
//! `CheckboxWidget`) replaces that built-in for every field of its kind.

use std::collections::HashMap;
use std::sync::Arc;

use formkit_core::{FieldPath, WidgetResolutionError};
use formkit_schema::SchemaKind;

use crate::render::WidgetProps;

/// The built-in widget set. Rendering them is the renderer's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinWidget {
    /// Single-line text input.
    TextInput,
    /// Numeric input.
    NumericInput,
    /// Checkbox.
    Checkbox,
    /// Choice among `enum` values.
    Select,
}

impl BuiltinWidget {
    /// The registry name of this widget.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TextInput => "TextWidget",
            Self::NumericInput => "UpDownWidget",
            Self::Checkbox => "CheckboxWidget",
            Self::Select => "SelectWidget",
        }
    }

    /// Look up a built-in by registry name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "TextWidget" => Some(Self::TextInput),
            "UpDownWidget" => Some(Self::NumericInput),
            "CheckboxWidget" => Some(Self::Checkbox),
            "SelectWidget" => Some(Self::Select),
            _ => None,
        }
    }

    /// The built-in used for `kind` when no hint is given.
    pub fn default_for(kind: SchemaKind, has_enum: bool) -> Option<Self> {
        match kind {
            _ if has_enum && kind.is_primitive() => Some(Self::Select),
            SchemaKind::String => Some(Self::TextInput),
            SchemaKind::Number | SchemaKind::Integer => Some(Self::NumericInput),
            SchemaKind::Boolean => Some(Self::Checkbox),
            SchemaKind::Object | SchemaKind::Array => None,
        }
    }

    /// Whether this widget can edit a field of `kind`.
    pub fn supports(&self, kind: SchemaKind, has_enum: bool) -> bool {
        match self {
            Self::TextInput => matches!(
                kind,
                SchemaKind::String | SchemaKind::Number | SchemaKind::Integer
            ),
            Self::NumericInput => matches!(kind, SchemaKind::Number | SchemaKind::Integer),
            Self::Checkbox => kind == SchemaKind::Boolean,
            Self::Select => kind.is_primitive() && (has_enum || kind == SchemaKind::Boolean),
        }
    }
}

fn expand_alias(hint: &str) -> &str {
    match hint {
        "text" => "TextWidget",
        "updown" => "UpDownWidget",
        "checkbox" => "CheckboxWidget",
        "select" => "SelectWidget",
        other => other,
    }
}

/// Where a resolved widget comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetSource {
    /// A caller-registered override, looked up by name at render time.
    Override,
    /// A built-in rendered by the renderer.
    Builtin(BuiltinWidget),
}

/// The outcome of resolving a leaf field's widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWidget {
    /// The registry name that matched.
    pub name: String,
    /// Override or built-in.
    pub source: WidgetSource,
}

impl ResolvedWidget {
    /// Whether an override was selected.
    pub fn is_override(&self) -> bool {
        self.source == WidgetSource::Override
    }
}

/// A caller-supplied rendering capability for leaf fields.
pub trait Widget<O>: Send + Sync {
    /// Render the field described by `props`.
    fn render(&self, props: &WidgetProps<'_>) -> O;
}

impl<O, F> Widget<O> for F
where
    F: Fn(&WidgetProps<'_>) -> O + Send + Sync,
{
    fn render(&self, props: &WidgetProps<'_>) -> O {
        self(props)
    }
}

/// Widget resolution, independent of the render output type.
pub trait WidgetResolver {
    /// Resolve the widget for a leaf field.
    fn resolve(
        &self,
        path: &FieldPath,
        kind: SchemaKind,
        has_enum: bool,
        hint: Option<&str>,
    ) -> Result<ResolvedWidget, WidgetResolutionError>;
}

/// Override table layered over the built-in widgets.
pub struct WidgetRegistry<O> {
    overrides: HashMap<String, Arc<dyn Widget<O>>>,
}

impl<O> std::fmt::Debug for WidgetRegistry<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.overrides.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("WidgetRegistry")
            .field("overrides", &names)
            .finish()
    }
}

impl<O> Default for WidgetRegistry<O> {
    fn default() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }
}

impl<O> WidgetRegistry<O> {
    /// An empty registry (built-ins only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `widget` under `name`, replacing any previous override.
    pub fn register(&mut self, name: impl Into<String>, widget: Arc<dyn Widget<O>>) {
        self.overrides.insert(name.into(), widget);
    }

    /// The override registered under `name`.
    pub fn override_widget(&self, name: &str) -> Option<&Arc<dyn Widget<O>>> {
        self.overrides.get(name)
    }

    /// Number of registered overrides.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

impl<O> WidgetResolver for WidgetRegistry<O> {
    fn resolve(
        &self,
        path: &FieldPath,
        kind: SchemaKind,
        has_enum: bool,
        hint: Option<&str>,
    ) -> Result<ResolvedWidget, WidgetResolutionError> {
        let unresolved = |widget: &str| WidgetResolutionError {
            path: path.to_string(),
            kind: kind.to_string(),
            widget: widget.to_string(),
        };

        let name = match hint {
            Some(h) => h,
            None => BuiltinWidget::default_for(kind, has_enum)
                .map(|b| b.name())
                .ok_or_else(|| unresolved("(default)"))?,
        };

        for candidate in [name, expand_alias(name)] {
            if self.overrides.contains_key(candidate) {
                return Ok(ResolvedWidget {
                    name: candidate.to_string(),
                    source: WidgetSource::Override,
                });
            }
        }

        match BuiltinWidget::from_name(expand_alias(name)) {
            Some(builtin) if builtin.supports(kind, has_enum) => Ok(ResolvedWidget {
                name: builtin.name().to_string(),
                source: WidgetSource::Builtin(builtin),
            }),
            _ => Err(unresolved(name)),
        }
    }
}

//! # Renderer Capabilities
//!
//! formkit never produces markup. A [`Renderer`] is the external
//! collaborator that turns the data it is handed into whatever output the
//! host needs (widgets, HTML, terminal text). The session walks its field
//! tree bottom-up and calls:
//!
//! - [`Renderer::widget`] for built-in leaf widgets (overrides are called
//!   directly through the [`Widget`](crate::Widget) trait),
//! - [`Renderer::object`] and [`Renderer::array`] for containers,
//! - [`Renderer::field`] to wrap every non-root node with its label,
//!   description, help and errors,
//! - [`Renderer::submit`], [`Renderer::error_list`] and [`Renderer::form`]
//!   once per render.
//!
//! Callbacks are modelled as [`FormEvent`]s carried in the props.

pub mod outline;

use serde_json::Value;

use formkit_core::{FieldId, FieldPath, ItemKey};
use formkit_schema::{LocalizedError, SchemaKind};

use crate::event::FormEvent;
use crate::widget::BuiltinWidget;

pub use outline::OutlineRenderer;

/// Everything a leaf widget needs.
#[derive(Debug, Clone)]
pub struct WidgetProps<'a> {
    /// Arena handle, for building events.
    pub field: FieldId,
    /// DOM-style element id.
    pub id: String,
    /// Location in the form value.
    pub path: &'a FieldPath,
    /// The field's data kind.
    pub kind: SchemaKind,
    /// Display label.
    pub label: &'a str,
    /// Current value; `None` when absent.
    pub value: Option<&'a Value>,
    /// Allowed values, for select widgets.
    pub options: Option<&'a [Value]>,
    /// Placeholder text.
    pub placeholder: Option<&'a str>,
    /// Whether the parent object requires this field.
    pub required: bool,
    /// Whether input is disabled.
    pub disabled: bool,
    /// Whether input is read-only.
    pub readonly: bool,
    /// Whether the widget should take focus on first render.
    pub autofocus: bool,
    /// Errors for this exact field.
    pub errors: &'a [LocalizedError],
}

impl WidgetProps<'_> {
    /// The event to dispatch when the input changes.
    pub fn on_change(&self, value: Value) -> FormEvent {
        FormEvent::Change {
            field: self.field,
            value,
        }
    }

    /// The event to dispatch when the input loses focus.
    pub fn on_blur(&self) -> FormEvent {
        FormEvent::Blur { field: self.field }
    }

    /// The event to dispatch when the input gains focus.
    pub fn on_focus(&self) -> FormEvent {
        FormEvent::Focus { field: self.field }
    }
}

/// Field template data wrapped around every non-root node.
#[derive(Debug, Clone)]
pub struct FieldTemplateProps<'a> {
    /// DOM-style element id.
    pub id: String,
    /// The field's data kind.
    pub kind: SchemaKind,
    /// Display label.
    pub label: &'a str,
    /// Whether the template should show the label. Checkboxes and
    /// containers show their own; `ui:options.label: false` hides it.
    pub display_label: bool,
    /// Whether the parent object requires this field.
    pub required: bool,
    /// Description text.
    pub description: Option<&'a str>,
    /// Help text.
    pub help: Option<&'a str>,
    /// Errors for this exact field.
    pub errors: &'a [LocalizedError],
    /// Whether the field is hidden.
    pub hidden: bool,
    /// `ui:classNames`.
    pub class_names: Option<&'a str>,
}

/// Data for an object container.
#[derive(Debug, Clone)]
pub struct ObjectProps<'a> {
    /// DOM-style element id.
    pub id: String,
    /// Title, if any.
    pub title: Option<&'a str>,
    /// Description, if any.
    pub description: Option<&'a str>,
}

/// Data for an array container.
#[derive(Debug, Clone)]
pub struct ArrayProps<'a> {
    /// DOM-style element id.
    pub id: String,
    /// Title, if any.
    pub title: Option<&'a str>,
    /// Whether an item can be added now.
    pub can_add: bool,
    /// The event to dispatch when the add button is pressed.
    pub on_add: FormEvent,
    /// `ui:classNames`.
    pub class_names: Option<&'a str>,
}

/// One rendered array item.
#[derive(Debug, Clone)]
pub struct ArrayItemOutput<O> {
    /// Stable identity; use it as the item's element key.
    pub key: ItemKey,
    /// Current position.
    pub index: usize,
    /// The rendered item.
    pub content: O,
    /// Whether the remove button should be offered.
    pub removable: bool,
    /// The event to dispatch when the remove button is pressed.
    pub on_remove: FormEvent,
}

/// Data for the submit control.
#[derive(Debug, Clone)]
pub struct SubmitProps<'a> {
    /// Whether submitting is currently disabled.
    pub disabled: bool,
    /// Button label.
    pub label: &'a str,
}

/// The external rendering capability.
pub trait Renderer {
    /// What rendering produces.
    type Output;

    /// Render a built-in leaf widget.
    fn widget(&mut self, widget: BuiltinWidget, props: &WidgetProps<'_>) -> Self::Output;

    /// Wrap a rendered node with its field template.
    fn field(&mut self, props: &FieldTemplateProps<'_>, content: Self::Output) -> Self::Output;

    /// Render an object from its rendered children, in display order.
    fn object(&mut self, props: &ObjectProps<'_>, children: Vec<Self::Output>) -> Self::Output;

    /// Render an array from its rendered items, in list order.
    fn array(
        &mut self,
        props: &ArrayProps<'_>,
        items: Vec<ArrayItemOutput<Self::Output>>,
    ) -> Self::Output;

    /// Render the flat error list shown above the submit control.
    fn error_list(&mut self, errors: &[LocalizedError]) -> Self::Output;

    /// Render the submit control.
    fn submit(&mut self, props: &SubmitProps<'_>) -> Self::Output;

    /// Assemble the whole form.
    fn form(
        &mut self,
        body: Self::Output,
        error_list: Option<Self::Output>,
        submit: Self::Output,
    ) -> Self::Output;
}

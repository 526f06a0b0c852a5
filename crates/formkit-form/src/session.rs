//! # Form Session
//!
//! Owns the schema, the form value, the controller tree and the widget
//! registry, and runs the submit lifecycle:
//!
//! ```text
//!            write                                   handler Ok
//! Editing ─────────▶ Editing                Valid ─────────────▶ Submitted
//!    │                  ▲                     ▲ │
//!    │ begin_validation │ write               │ │ handler Err
//!    ▼                  │                     │ ▼
//! Validating ──────▶ Invalid / Valid ─────────┘ Editing
//! ```
//!
//! `teardown()` moves any state to `Disposed`. `Submitted` and `Disposed`
//! are terminal.
//!
//! ## Validation passes
//!
//! A pass is split in two so the validator may run elsewhere:
//! [`FormSession::begin_validation`] snapshots the value and hands out a
//! [`ValidationTicket`] carrying an epoch; [`FormSession::finish_validation`]
//! applies the violations only if that epoch is still the one in flight.
//! Tearing the session down moves the epoch, so late results are
//! discarded. [`FormSession::submit`] composes both halves synchronously.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use formkit_core::{
    remove_at, value_at, write_at, FieldId, FieldPath, FormkitError, ItemKey, SessionError,
    SessionId, SubmitRejected, WidgetResolutionError,
};
use formkit_schema::{
    localize, FormSchema, JsonSchemaValidator, Locale, LocalizedError, RawViolation, SchemaKind,
    ValidatorAdapter,
};

use crate::builder::{fill_defaults, FieldTreeBuilder, Slot};
use crate::config::FormConfig;
use crate::event::FormEvent;
use crate::field::{ArrayItem, Children, FieldController};
use crate::render::{
    ArrayItemOutput, ArrayProps, FieldTemplateProps, ObjectProps, Renderer, SubmitProps,
    WidgetProps,
};
use crate::tree::FieldTree;
use crate::ui::UiSchema;
use crate::widget::{Widget, WidgetRegistry, WidgetSource};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Lifecycle state of a [`FormSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Accepting edits. Errors from the last pass stay visible.
    Editing,
    /// A validation pass is in flight.
    Validating,
    /// The last pass found no violations.
    Valid,
    /// The last pass found violations.
    Invalid,
    /// The submit handler accepted the value. Terminal.
    Submitted,
    /// The session was torn down. Terminal.
    Disposed,
}

impl SessionState {
    /// Lowercase state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::Validating => "validating",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Submitted => "submitted",
            Self::Disposed => "disposed",
        }
    }

    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted | Self::Disposed)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record of a state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTransition {
    /// State before the transition.
    pub from: SessionState,
    /// State after the transition.
    pub to: SessionState,
    /// When the transition occurred.
    pub at: DateTime<Utc>,
}

/// Proof that a validation pass was started, with the value it validates.
#[derive(Debug, Clone)]
pub struct ValidationTicket {
    epoch: u64,
    snapshot: Value,
}

impl ValidationTicket {
    /// The epoch this pass belongs to.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The value under validation.
    pub fn snapshot(&self) -> &Value {
        &self.snapshot
    }
}

/// Result of finishing a validation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// No violations. The session is `Valid`.
    Valid,
    /// Violations were found and routed onto the tree.
    Invalid {
        /// Errors delivered to live fields, in display order.
        errors: Vec<LocalizedError>,
    },
    /// The pass was superseded or the session torn down.
    Discarded,
}

/// Result of [`FormSession::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The handler accepted this snapshot. The session is `Submitted`.
    Submitted(Value),
    /// The handler rejected the snapshot. The session is back to editing.
    Rejected(SubmitRejected),
    /// Validation failed. The session is `Invalid`.
    Invalid {
        /// Errors delivered to live fields, in display order.
        errors: Vec<LocalizedError>,
    },
}

/// Receives the validated snapshot on submit.
pub trait SubmitHandler {
    /// Accept or reject the snapshot.
    fn submit(&mut self, snapshot: &Value) -> Result<(), SubmitRejected>;
}

impl<F> SubmitHandler for F
where
    F: FnMut(&Value) -> Result<(), SubmitRejected>,
{
    fn submit(&mut self, snapshot: &Value) -> Result<(), SubmitRejected> {
        self(snapshot)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Assembles a [`FormSession`].
pub struct FormSessionBuilder<O> {
    schema: FormSchema,
    ui: UiSchema,
    data: Value,
    registry: WidgetRegistry<O>,
    config: FormConfig,
    validator: Option<Box<dyn ValidatorAdapter>>,
}

impl<O> FormSessionBuilder<O> {
    /// Presentation hints.
    pub fn ui_schema(mut self, ui: UiSchema) -> Self {
        self.ui = ui;
        self
    }

    /// Initial form value.
    pub fn form_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Register a widget override.
    pub fn widget(mut self, name: impl Into<String>, widget: Arc<dyn Widget<O>>) -> Self {
        self.registry.register(name, widget);
        self
    }

    /// Replace the whole widget registry.
    pub fn registry(mut self, registry: WidgetRegistry<O>) -> Self {
        self.registry = registry;
        self
    }

    /// Session configuration.
    pub fn config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    /// Message locale.
    pub fn locale(mut self, locale: Locale) -> Self {
        self.config.locale = locale;
        self
    }

    /// Validator to use instead of the JSON Schema validator.
    pub fn validator(mut self, validator: Box<dyn ValidatorAdapter>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Build the session.
    ///
    /// # Errors
    ///
    /// Fails if the schema cannot be compiled by the validator or a leaf
    /// widget cannot be resolved.
    pub fn build(self) -> Result<FormSession<O>, FormkitError> {
        let validator: Box<dyn ValidatorAdapter> = match self.validator {
            Some(v) => v,
            None => Box::new(JsonSchemaValidator::new(&self.schema)?),
        };

        let mut value = self.data;
        fill_defaults(self.schema.root(), &mut value);

        let tree = FieldTreeBuilder::new(&self.registry).build(
            self.schema.root(),
            &Arc::new(self.ui),
            &value,
        )?;

        let id = SessionId::new();
        tracing::info!(
            session_id = %id,
            fields = tree.len(),
            overrides = self.registry.override_count(),
            locale = %self.config.locale,
            "form session built"
        );

        Ok(FormSession {
            id,
            schema: Arc::new(self.schema),
            registry: self.registry,
            validator,
            config: self.config,
            tree,
            value,
            state: SessionState::Editing,
            epoch: 0,
            in_flight: None,
            history: Vec::new(),
        })
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One editing session over one form value.
///
/// `O` is the output type of the renderer the session's widget overrides
/// produce.
pub struct FormSession<O> {
    id: SessionId,
    schema: Arc<FormSchema>,
    registry: WidgetRegistry<O>,
    validator: Box<dyn ValidatorAdapter>,
    config: FormConfig,
    tree: FieldTree,
    value: Value,
    state: SessionState,
    epoch: u64,
    in_flight: Option<u64>,
    history: Vec<SessionTransition>,
}

impl<O> std::fmt::Debug for FormSession<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("epoch", &self.epoch)
            .field("fields", &self.tree.len())
            .field("registry", &self.registry)
            .finish()
    }
}

impl<O> FormSession<O> {
    /// Start assembling a session for `schema`.
    pub fn builder(schema: FormSchema) -> FormSessionBuilder<O> {
        FormSessionBuilder {
            schema,
            ui: UiSchema::default(),
            data: Value::Null,
            registry: WidgetRegistry::new(),
            config: FormConfig::default(),
            validator: None,
        }
    }

    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// All state transitions so far, oldest first.
    pub fn history(&self) -> &[SessionTransition] {
        &self.history
    }

    /// The schema being edited.
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// The session configuration.
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// The current form value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The controller tree.
    pub fn tree(&self) -> &FieldTree {
        &self.tree
    }

    /// The live controller behind `id`.
    pub fn field(&self, id: FieldId) -> Option<&FieldController> {
        self.tree.get(id)
    }

    /// The live controller at `path`.
    pub fn field_at(&self, path: &FieldPath) -> Option<&FieldController> {
        self.tree.find(path)
    }

    /// The current value of a field; `None` when absent.
    pub fn field_value(&self, id: FieldId) -> Option<&Value> {
        self.tree
            .get(id)
            .and_then(|node| value_at(&self.value, &node.path))
    }

    /// All errors on the tree, in display order.
    pub fn errors(&self) -> Vec<LocalizedError> {
        self.tree.errors()
    }

    /// Whether the submit control should be disabled.
    pub fn submit_disabled(&self) -> bool {
        self.config.disabled
            || matches!(
                self.state,
                SessionState::Validating | SessionState::Submitted | SessionState::Disposed
            )
    }

    fn transition(&mut self, to: SessionState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        self.history.push(SessionTransition {
            from,
            to,
            at: Utc::now(),
        });
        tracing::debug!(session_id = %self.id, %from, %to, "session transition");
    }

    fn rejected(&self, operation: &str) -> SessionError {
        match self.state {
            SessionState::Disposed => SessionError::Disposed,
            SessionState::Validating => SessionError::ValidationInFlight,
            state => SessionError::InvalidTransition {
                state: state.to_string(),
                operation: operation.to_string(),
            },
        }
    }

    fn check_writable(&self, operation: &str) -> Result<(), SessionError> {
        match self.state {
            SessionState::Editing | SessionState::Valid | SessionState::Invalid => Ok(()),
            _ => Err(self.rejected(operation)),
        }
    }

    /// Writes after a validation pass resume editing. Errors stay visible
    /// until the next pass.
    fn resume_editing(&mut self) {
        if matches!(self.state, SessionState::Valid | SessionState::Invalid) {
            self.transition(SessionState::Editing);
        }
    }

    fn node(&self, id: FieldId) -> Result<&FieldController, SessionError> {
        self.tree
            .get(id)
            .ok_or_else(|| SessionError::UnknownField(id.to_string()))
    }

    fn node_mut(&mut self, id: FieldId) -> Result<&mut FieldController, SessionError> {
        self.tree
            .get_mut(id)
            .ok_or_else(|| SessionError::UnknownField(id.to_string()))
    }

    // -- Events -------------------------------------------------------------

    /// Apply one user interaction.
    pub fn dispatch(&mut self, event: FormEvent) -> Result<(), SessionError> {
        match event {
            FormEvent::Change { field, value } => self.set_value(field, value),
            FormEvent::Blur { field } => self.blur(field),
            FormEvent::Focus { field } => self.focus(field),
            FormEvent::AddItem { array } => self.add_item(array).map(|_| ()),
            FormEvent::RemoveItem { array, key } => self.remove_item(array, key).map(|_| ()),
        }
    }

    /// Write raw input to a leaf field.
    ///
    /// An empty string writes the field's `emptyValue` hint, or removes the
    /// value. Text written to a numeric field is parsed when possible and
    /// kept verbatim otherwise, for the validator to report.
    pub fn set_value(&mut self, field: FieldId, raw: Value) -> Result<(), SessionError> {
        self.check_writable("set value")?;
        let node = self.node(field)?;
        if !self.tree.is_leaf(field) {
            return Err(SessionError::NotALeaf(node.path.to_string()));
        }
        let path = node.path.clone();
        let normalized = normalize_input(node.kind(), &node.hint, raw);

        self.resume_editing();
        write_at(&mut self.value, &path, normalized);
        self.node_mut(field)?.dirty = true;
        tracing::debug!(session_id = %self.id, path = %path, "field written");
        Ok(())
    }

    /// Mark a field as having lost focus.
    pub fn blur(&mut self, field: FieldId) -> Result<(), SessionError> {
        if self.state == SessionState::Disposed {
            return Err(SessionError::Disposed);
        }
        let node = self.node_mut(field)?;
        node.focused = false;
        node.touched = true;
        Ok(())
    }

    /// Mark a field as focused.
    pub fn focus(&mut self, field: FieldId) -> Result<(), SessionError> {
        if self.state == SessionState::Disposed {
            return Err(SessionError::Disposed);
        }
        self.node_mut(field)?.focused = true;
        Ok(())
    }

    // -- Arrays -------------------------------------------------------------

    /// Append an empty item to an array field.
    ///
    /// Returns the new item's key, or `None` when the array does not allow
    /// adding (`addable: false` or `maxItems` reached).
    pub fn add_item(&mut self, array: FieldId) -> Result<Option<ItemKey>, SessionError> {
        self.check_writable("add item")?;
        let node = self.node(array)?;
        let items = node
            .array()
            .ok_or_else(|| SessionError::NotAnArray(node.path.to_string()))?;
        if !items.can_add(node.schema.max_items()) {
            tracing::debug!(path = %node.path, "array does not accept more items");
            return Ok(None);
        }
        let Some(item_schema) = node.schema.items().cloned() else {
            return Err(SessionError::NotAnArray(node.path.to_string()));
        };
        let item_hint = node.hint.items();
        let item_value = node.schema.empty_item_value();
        let slot = Slot {
            parent: Some(array),
            name: None,
            path: node.path.index(items.len()),
            required: false,
        };

        self.resume_editing();
        let field = FieldTreeBuilder::new(&self.registry)
            .build_node(
                &mut self.tree,
                slot,
                &item_schema,
                &item_hint,
                Some(&item_value),
            )
            .map_err(|e| {
                tracing::warn!(error = %e, "item widget resolution failed");
                SessionError::Widget(e)
            })?;

        let path = self.node(field)?.path.clone();
        write_at(&mut self.value, &path, Some(item_value));

        let node = self.node_mut(array)?;
        node.dirty = true;
        let Some(items) = node.array_mut() else {
            return Err(SessionError::NotAnArray(path.to_string()));
        };
        let key = items.mint_key();
        items.push(ArrayItem { key, field });
        tracing::debug!(session_id = %self.id, path = %path, %key, "array item added");
        Ok(Some(key))
    }

    /// Remove the item with `key` from an array field.
    ///
    /// A silent no-op returning `false` when the key is unknown or items
    /// are not removable. Errors inside the removed item are discarded.
    pub fn remove_item(&mut self, array: FieldId, key: ItemKey) -> Result<bool, SessionError> {
        self.check_writable("remove item")?;
        let node = self.node(array)?;
        let items = node
            .array()
            .ok_or_else(|| SessionError::NotAnArray(node.path.to_string()))?;
        if !items.removable() {
            tracing::debug!(path = %node.path, %key, "array items are not removable");
            return Ok(false);
        }
        let Some(position) = items.position(key) else {
            tracing::debug!(path = %node.path, %key, "no such array item");
            return Ok(false);
        };
        let array_path = node.path.clone();

        self.resume_editing();
        let node = self.node_mut(array)?;
        node.dirty = true;
        let Some(items) = node.array_mut() else {
            return Err(SessionError::NotAnArray(array_path.to_string()));
        };
        let removed = items.remove(position);
        let shifted: Vec<(FieldId, usize)> = items.items()[position..]
            .iter()
            .enumerate()
            .map(|(offset, item)| (item.field, position + offset))
            .collect();

        let destroyed = self.tree.remove_subtree(removed.field);
        self.tree.shift_items(array_path.depth(), &shifted);
        remove_at(&mut self.value, &array_path.index(position));
        tracing::debug!(
            session_id = %self.id,
            path = %array_path,
            %key,
            position,
            destroyed,
            "array item removed"
        );
        Ok(true)
    }

    // -- Validation ---------------------------------------------------------

    /// Start a validation pass over a snapshot of the current value.
    ///
    /// # Errors
    ///
    /// [`SessionError::ValidationInFlight`] while another pass runs,
    /// [`SessionError::InvalidTransition`] once submitted and
    /// [`SessionError::Disposed`] after teardown.
    pub fn begin_validation(&mut self) -> Result<ValidationTicket, SessionError> {
        match self.state {
            SessionState::Editing | SessionState::Valid | SessionState::Invalid => {}
            _ => return Err(self.rejected("validate")),
        }
        self.epoch += 1;
        self.in_flight = Some(self.epoch);
        self.transition(SessionState::Validating);
        Ok(ValidationTicket {
            epoch: self.epoch,
            snapshot: self.value.clone(),
        })
    }

    /// Run the session's validator over a ticket's snapshot.
    pub fn run_validation(&self, ticket: &ValidationTicket) -> Vec<RawViolation> {
        self.validator.validate(&ticket.snapshot)
    }

    /// Apply the violations found for `ticket`.
    ///
    /// Results for a pass that is no longer in flight are discarded
    /// without touching the session.
    pub fn finish_validation(
        &mut self,
        ticket: ValidationTicket,
        violations: &[RawViolation],
    ) -> ValidationOutcome {
        if self.state != SessionState::Validating || self.in_flight != Some(ticket.epoch) {
            tracing::warn!(
                session_id = %self.id,
                epoch = ticket.epoch,
                current = self.epoch,
                "discarding stale validation result"
            );
            return ValidationOutcome::Discarded;
        }
        self.in_flight = None;

        let localized = localize(violations, self.config.locale);
        let total = localized.len();
        let delivered = self.tree.distribute_errors(localized);
        if total > delivered {
            tracing::warn!(dropped = total - delivered, "errors without a live field dropped");
        }

        if total == 0 {
            self.transition(SessionState::Valid);
            tracing::info!(session_id = %self.id, epoch = ticket.epoch, "validation passed");
            ValidationOutcome::Valid
        } else {
            self.transition(SessionState::Invalid);
            tracing::info!(
                session_id = %self.id,
                epoch = ticket.epoch,
                violations = total,
                "validation failed"
            );
            ValidationOutcome::Invalid {
                errors: self.tree.errors(),
            }
        }
    }

    /// Run a complete validation pass synchronously.
    pub fn validate(&mut self) -> Result<ValidationOutcome, SessionError> {
        let ticket = self.begin_validation()?;
        let violations = self.run_validation(&ticket);
        Ok(self.finish_validation(ticket, &violations))
    }

    /// Hand the value to `handler`. Only allowed while `Valid`.
    ///
    /// On acceptance the session becomes `Submitted`; on rejection it
    /// returns to `Editing` with the value untouched.
    pub fn accept<H: SubmitHandler + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> Result<SubmitOutcome, SessionError> {
        if self.state != SessionState::Valid {
            return Err(self.rejected("submit"));
        }
        let snapshot = self.value.clone();
        match handler.submit(&snapshot) {
            Ok(()) => {
                self.transition(SessionState::Submitted);
                tracing::info!(session_id = %self.id, "form submitted");
                Ok(SubmitOutcome::Submitted(snapshot))
            }
            Err(rejection) => {
                self.transition(SessionState::Editing);
                tracing::warn!(session_id = %self.id, reason = %rejection.reason, "submission rejected");
                Ok(SubmitOutcome::Rejected(rejection))
            }
        }
    }

    /// Validate, then submit to `handler` if valid.
    pub fn submit<H: SubmitHandler + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> Result<SubmitOutcome, SessionError> {
        match self.validate()? {
            ValidationOutcome::Valid => self.accept(handler),
            ValidationOutcome::Invalid { errors } => Ok(SubmitOutcome::Invalid { errors }),
            ValidationOutcome::Discarded => Err(self.rejected("submit")),
        }
    }

    /// Dispose the session. Idempotent. Any pass in flight is invalidated.
    pub fn teardown(&mut self) {
        if self.state == SessionState::Disposed {
            return;
        }
        if self.in_flight.take().is_some() {
            self.epoch += 1;
        }
        self.tree = FieldTree::default();
        self.transition(SessionState::Disposed);
        tracing::info!(session_id = %self.id, "form session torn down");
    }

    // -- Rendering ----------------------------------------------------------

    /// Render the whole form through `renderer`.
    ///
    /// Built-in leaf widgets are rendered by the renderer; overrides by
    /// the registered [`Widget`]. Errors owned by the form itself have no
    /// field template to show them, so they are listed even when
    /// `show_error_list` is off.
    pub fn render<R>(&self, renderer: &mut R) -> Result<O, SessionError>
    where
        R: Renderer<Output = O>,
    {
        if self.state == SessionState::Disposed {
            return Err(SessionError::Disposed);
        }
        let body = self.render_node(renderer, self.tree.root())?;
        let errors = self.tree.errors();
        let root_errors = self.node(self.tree.root())?.errors.as_slice();
        let listed: Option<&[LocalizedError]> = if self.config.show_error_list && !errors.is_empty() {
            Some(errors.as_slice())
        } else if !root_errors.is_empty() {
            Some(root_errors)
        } else {
            None
        };
        let error_list = listed.map(|list| renderer.error_list(list));
        let submit = renderer.submit(&SubmitProps {
            disabled: self.submit_disabled(),
            label: &self.config.submit_label,
        });
        Ok(renderer.form(body, error_list, submit))
    }

    fn field_disabled(&self, node: &FieldController) -> bool {
        self.config.disabled || node.hint.disabled || self.state == SessionState::Submitted
    }

    fn render_node<R>(&self, renderer: &mut R, id: FieldId) -> Result<O, SessionError>
    where
        R: Renderer<Output = O>,
    {
        let node = self.node(id)?;
        let dom_id = node.path.dom_id(&self.config.id_prefix);
        let disabled = self.field_disabled(node);
        let title = Some(node.label()).filter(|label| !label.is_empty());

        let content = match &node.children {
            Children::None => self.render_leaf(renderer, node, dom_id.clone(), disabled)?,
            Children::Object(ids) => {
                let mut children = Vec::with_capacity(ids.len());
                for child in ids {
                    children.push(self.render_node(renderer, *child)?);
                }
                let props = ObjectProps {
                    id: dom_id.clone(),
                    title,
                    description: node.description(),
                };
                renderer.object(&props, children)
            }
            Children::Array(array) => {
                let mut items = Vec::with_capacity(array.len());
                for (index, item) in array.items().iter().enumerate() {
                    items.push(ArrayItemOutput {
                        key: item.key,
                        index,
                        content: self.render_node(renderer, item.field)?,
                        removable: array.removable() && !disabled,
                        on_remove: FormEvent::RemoveItem {
                            array: id,
                            key: item.key,
                        },
                    });
                }
                let props = ArrayProps {
                    id: dom_id.clone(),
                    title,
                    can_add: array.can_add(node.schema.max_items()) && !disabled,
                    on_add: FormEvent::AddItem { array: id },
                    class_names: node.hint.class_names.as_deref(),
                };
                renderer.array(&props, items)
            }
        };

        if node.path.is_root() {
            return Ok(content);
        }
        let template = FieldTemplateProps {
            id: dom_id,
            kind: node.kind(),
            label: node.label(),
            display_label: node.display_label(),
            required: node.required,
            description: node.description(),
            help: node.hint.help.as_deref(),
            errors: &node.errors,
            hidden: node.hint.hidden,
            class_names: node.hint.class_names.as_deref(),
        };
        Ok(renderer.field(&template, content))
    }

    fn render_leaf<R>(
        &self,
        renderer: &mut R,
        node: &FieldController,
        dom_id: String,
        disabled: bool,
    ) -> Result<O, SessionError>
    where
        R: Renderer<Output = O>,
    {
        let props = WidgetProps {
            field: node.id,
            id: dom_id,
            path: &node.path,
            kind: node.kind(),
            label: node.label(),
            value: value_at(&self.value, &node.path),
            options: node.schema.enum_values(),
            placeholder: node.hint.placeholder.as_deref(),
            required: node.required,
            disabled,
            readonly: self.config.readonly || node.hint.readonly,
            autofocus: node.hint.autofocus,
            errors: &node.errors,
        };
        let Some(widget) = &node.widget else {
            return Err(SessionError::NotALeaf(node.path.to_string()));
        };
        match &widget.source {
            WidgetSource::Builtin(builtin) => Ok(renderer.widget(*builtin, &props)),
            WidgetSource::Override => self
                .registry
                .override_widget(&widget.name)
                .map(|w| w.render(&props))
                .ok_or_else(|| {
                    SessionError::Widget(WidgetResolutionError {
                        path: node.path.to_string(),
                        kind: node.kind().to_string(),
                        widget: widget.name.clone(),
                    })
                }),
        }
    }
}

/// Map raw widget input onto the value stored for a field of `kind`.
fn normalize_input(kind: SchemaKind, hint: &UiSchema, raw: Value) -> Option<Value> {
    match raw {
        Value::Null => None,
        Value::String(text) if text.is_empty() => hint.options.empty_value.clone(),
        Value::String(text) if matches!(kind, SchemaKind::Number | SchemaKind::Integer) => {
            Some(parse_number(&text).unwrap_or(Value::String(text)))
        }
        other => Some(other),
    }
}

fn parse_number(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Value::from(i));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

//! # Field Tree Builder
//!
//! Walks the schema tree, the presentation overlay and the initial form
//! value in parallel and produces the controller arena.
//!
//! - Objects get one child per declared property, in `ui:order` order.
//! - Arrays get one item per element present in the value, each with a
//!   freshly minted key.
//! - Primitives get a leaf controller whose widget is resolved here, so
//!   an unresolvable widget fails the build rather than the first render.
//!
//! Before walking, [`fill_defaults`] completes the value: absent
//! primitives take their `default`, absent required containers take their
//! empty value, empty arrays are padded to `minItems`.

use std::sync::Arc;

use serde_json::Value;

use formkit_core::{FieldId, FieldPath, WidgetResolutionError};
use formkit_schema::{SchemaKind, SchemaNode};

use crate::field::{ArrayController, ArrayItem, Children, FieldController};
use crate::tree::FieldTree;
use crate::ui::UiSchema;
use crate::widget::WidgetResolver;

/// Complete `value` with schema defaults. Never invents content for
/// required primitives.
pub fn fill_defaults(schema: &SchemaNode, value: &mut Value) {
    if value.is_null() {
        if let Some(empty) = schema.empty_value() {
            *value = empty;
        }
        return;
    }

    match schema.kind() {
        SchemaKind::Object => {
            let Value::Object(map) = value else {
                return;
            };
            for prop in schema.properties() {
                match map.get_mut(&prop.name) {
                    Some(child) => fill_defaults(&prop.schema, child),
                    None => {
                        let include =
                            prop.schema.kind().is_primitive() || schema.is_required(&prop.name);
                        if let Some(empty) = prop.schema.empty_value().filter(|_| include) {
                            map.insert(prop.name.clone(), empty);
                        }
                    }
                }
            }
        }
        SchemaKind::Array => {
            let Value::Array(items) = value else {
                return;
            };
            if items.is_empty() {
                let count = schema.min_items().unwrap_or(0);
                items.resize(count, schema.empty_item_value());
            }
            if let Some(item_schema) = schema.items() {
                for item in items.iter_mut() {
                    fill_defaults(item_schema, item);
                }
            }
        }
        _ => {}
    }
}

/// Builds controller subtrees, resolving leaf widgets through `resolver`.
pub struct FieldTreeBuilder<'r> {
    resolver: &'r dyn WidgetResolver,
}

/// Where a new subtree hangs.
pub(crate) struct Slot {
    pub parent: Option<FieldId>,
    pub name: Option<String>,
    pub path: FieldPath,
    pub required: bool,
}

impl<'r> FieldTreeBuilder<'r> {
    /// A builder resolving widgets through `resolver`.
    pub fn new(resolver: &'r dyn WidgetResolver) -> Self {
        Self { resolver }
    }

    /// Build the whole tree for `value`, which must already have been
    /// passed through [`fill_defaults`].
    ///
    /// # Errors
    ///
    /// Returns [`WidgetResolutionError`] for the first leaf whose widget
    /// cannot be resolved.
    pub fn build(
        &self,
        schema: &Arc<SchemaNode>,
        hint: &Arc<UiSchema>,
        value: &Value,
    ) -> Result<FieldTree, WidgetResolutionError> {
        let mut tree = FieldTree::new();
        let slot = Slot {
            parent: None,
            name: None,
            path: FieldPath::root(),
            required: false,
        };
        self.build_node(&mut tree, slot, schema, hint, Some(value))?;
        Ok(tree)
    }

    pub(crate) fn build_node(
        &self,
        tree: &mut FieldTree,
        slot: Slot,
        schema: &Arc<SchemaNode>,
        hint: &Arc<UiSchema>,
        value: Option<&Value>,
    ) -> Result<FieldId, WidgetResolutionError> {
        let id = tree.next_id();
        let kind = schema.kind();
        let widget = if kind.is_primitive() {
            let has_enum = schema.enum_values().is_some();
            Some(
                self.resolver
                    .resolve(&slot.path, kind, has_enum, hint.widget.as_deref())?,
            )
        } else {
            None
        };

        let path = slot.path.clone();
        tree.insert(FieldController {
            id,
            parent: slot.parent,
            path: slot.path,
            name: slot.name,
            schema: Arc::clone(schema),
            hint: Arc::clone(hint),
            required: slot.required,
            widget,
            children: Children::None,
            errors: Vec::new(),
            dirty: false,
            touched: false,
            focused: false,
        });

        let children = match kind {
            SchemaKind::Object => {
                let mut ids = Vec::new();
                for prop in hint.order_properties(schema.properties()) {
                    let child_slot = Slot {
                        parent: Some(id),
                        name: Some(prop.name.clone()),
                        path: path.property(prop.name.as_str()),
                        required: schema.is_required(&prop.name),
                    };
                    let child_value = value.and_then(|v| v.get(&prop.name));
                    ids.push(self.build_node(
                        tree,
                        child_slot,
                        &prop.schema,
                        &hint.child(&prop.name),
                        child_value,
                    )?);
                }
                Children::Object(ids)
            }
            SchemaKind::Array => {
                let item_hint = hint.items();
                let mut array =
                    ArrayController::new(hint.addable(), hint.removable() && item_hint.removable());
                if let (Some(item_schema), Some(Value::Array(items))) = (schema.items(), value) {
                    for (index, item) in items.iter().enumerate() {
                        let item_slot = Slot {
                            parent: Some(id),
                            name: None,
                            path: path.index(index),
                            required: false,
                        };
                        let field =
                            self.build_node(tree, item_slot, item_schema, &item_hint, Some(item))?;
                        let key = array.mint_key();
                        array.push(ArrayItem { key, field });
                    }
                }
                if let (Some(item_schema), true) = (schema.items(), array.is_empty()) {
                    self.check_widgets(&path.index(0), item_schema, &item_hint)?;
                }
                Children::Array(array)
            }
            _ => Children::None,
        };

        if let Some(node) = tree.get_mut(id) {
            node.children = children;
        }
        Ok(id)
    }

    /// Resolve every leaf widget below `schema` without building
    /// controllers, so items added later cannot fail to resolve.
    fn check_widgets(
        &self,
        path: &FieldPath,
        schema: &SchemaNode,
        hint: &UiSchema,
    ) -> Result<(), WidgetResolutionError> {
        match schema.kind() {
            SchemaKind::Object => {
                for prop in schema.properties() {
                    self.check_widgets(
                        &path.property(prop.name.as_str()),
                        &prop.schema,
                        &hint.child(&prop.name),
                    )?;
                }
            }
            SchemaKind::Array => {
                if let Some(items) = schema.items() {
                    self.check_widgets(&path.index(0), items, &hint.items())?;
                }
            }
            kind => {
                let has_enum = schema.enum_values().is_some();
                self.resolver
                    .resolve(path, kind, has_enum, hint.widget.as_deref())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::WidgetRegistry;
    use formkit_schema::FormSchema;
    use serde_json::json;

    fn schema() -> FormSchema {
        FormSchema::from_value(json!({
            "type": "object",
            "required": ["lotti"],
            "properties": {
                "nome": {"type": "string", "default": "anonimo"},
                "attivo": {"type": "boolean"},
                "lotti": {
                    "type": "array",
                    "minItems": 1,
                    "items": {
                        "type": "object",
                        "properties": {
                            "numero": {"type": "integer", "default": 1}
                        }
                    }
                },
                "extra": {
                    "type": "object",
                    "properties": {"nota": {"type": "string"}}
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_fill_defaults_from_absent_value() {
        let schema = schema();
        let mut value = Value::Null;
        fill_defaults(schema.root(), &mut value);
        assert_eq!(value, json!({"nome": "anonimo", "lotti": [{"numero": 1}]}));
    }

    #[test]
    fn test_fill_defaults_keeps_user_data() {
        let schema = schema();
        let mut value = json!({"nome": "Rossi", "lotti": [{}, {"numero": 7}]});
        fill_defaults(schema.root(), &mut value);
        assert_eq!(
            value,
            json!({"nome": "Rossi", "lotti": [{"numero": 1}, {"numero": 7}]})
        );
    }

    #[test]
    fn test_build_creates_controller_per_location() {
        let schema = schema();
        let registry: WidgetRegistry<String> = WidgetRegistry::new();
        let mut value = json!({"lotti": [{}, {}]});
        fill_defaults(schema.root(), &mut value);
        let tree = FieldTreeBuilder::new(&registry)
            .build(schema.root(), &Arc::new(UiSchema::default()), &value)
            .unwrap();

        // root, nome, attivo, lotti, 2 items with numero each, extra, extra/nota
        assert_eq!(tree.len(), 10);
        let numero = tree.find_pointer("/lotti/1/numero").unwrap();
        assert_eq!(numero.kind(), SchemaKind::Integer);
        assert!(tree.find_pointer("/extra/nota").is_some());

        let lotti = tree.find_pointer("/lotti").unwrap();
        let keys = lotti.array().unwrap().keys();
        assert_eq!(keys.len(), 2);
        assert_ne!(keys[0], keys[1]);
    }

    #[test]
    fn test_build_fails_on_unknown_widget() {
        let schema = schema();
        let registry: WidgetRegistry<String> = WidgetRegistry::new();
        let hint = Arc::new(UiSchema::from_value(&json!({"nome": {"ui:widget": "color"}})));
        let err = FieldTreeBuilder::new(&registry)
            .build(schema.root(), &hint, &json!({}))
            .unwrap_err();
        assert_eq!(err.path, "/nome");
    }

    #[test]
    fn test_build_checks_widgets_of_empty_arrays() {
        let schema = schema();
        let registry: WidgetRegistry<String> = WidgetRegistry::new();
        let hint = Arc::new(UiSchema::from_value(&json!({
            "lotti": {"items": {"numero": {"ui:widget": "slider"}}}
        })));
        let err = FieldTreeBuilder::new(&registry)
            .build(schema.root(), &hint, &json!({"lotti": []}))
            .unwrap_err();
        assert_eq!(err.path, "/lotti/0/numero");
        assert_eq!(err.widget, "slider");
    }
}

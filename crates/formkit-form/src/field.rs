//! # Field Controllers
//!
//! One [`FieldController`] per schema location the form renders. Object
//! and array controllers hold child handles; array controllers also hold
//! the stable [`ItemKey`] of every item. Controllers never own the form
//! value. The session reads and writes it by path.

use std::sync::Arc;

use formkit_core::{FieldId, FieldPath, ItemKey, ItemKeyAllocator};
use formkit_schema::{LocalizedError, SchemaKind, SchemaNode};

use crate::ui::UiSchema;
use crate::widget::ResolvedWidget;

/// Children of a controller.
#[derive(Debug, Clone)]
pub enum Children {
    /// A leaf.
    None,
    /// Object properties, in display order.
    Object(Vec<FieldId>),
    /// Array items, in list order.
    Array(ArrayController),
}

/// One item of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayItem {
    /// Stable identity, independent of position.
    pub key: ItemKey,
    /// Root controller of the item's subtree.
    pub field: FieldId,
}

/// Item bookkeeping of an array field.
#[derive(Debug, Clone)]
pub struct ArrayController {
    items: Vec<ArrayItem>,
    keys: ItemKeyAllocator,
    addable: bool,
    removable: bool,
}

impl ArrayController {
    pub(crate) fn new(addable: bool, removable: bool) -> Self {
        Self {
            items: Vec::new(),
            keys: ItemKeyAllocator::new(),
            addable,
            removable,
        }
    }

    pub(crate) fn mint_key(&mut self) -> ItemKey {
        self.keys.mint()
    }

    pub(crate) fn push(&mut self, item: ArrayItem) {
        self.items.push(item);
    }

    pub(crate) fn remove(&mut self, position: usize) -> ArrayItem {
        self.items.remove(position)
    }

    /// Items in list order.
    pub fn items(&self) -> &[ArrayItem] {
        &self.items
    }

    /// Item keys in list order.
    pub fn keys(&self) -> Vec<ItemKey> {
        self.items.iter().map(|item| item.key).collect()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the array has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current position of the item with `key`.
    pub fn position(&self, key: ItemKey) -> Option<usize> {
        self.items.iter().position(|item| item.key == key)
    }

    /// Whether items carry a remove affordance.
    pub fn removable(&self) -> bool {
        self.removable
    }

    /// Whether another item may be appended given the schema's `maxItems`.
    pub fn can_add(&self, max_items: Option<usize>) -> bool {
        self.addable && max_items.map_or(true, |max| self.items.len() < max)
    }

    /// Total keys ever minted by this array.
    pub fn minted(&self) -> u64 {
        self.keys.minted()
    }
}

/// Controller of one rendered field.
#[derive(Debug, Clone)]
pub struct FieldController {
    pub(crate) id: FieldId,
    pub(crate) parent: Option<FieldId>,
    pub(crate) path: FieldPath,
    pub(crate) name: Option<String>,
    pub(crate) schema: Arc<SchemaNode>,
    pub(crate) hint: Arc<UiSchema>,
    pub(crate) required: bool,
    pub(crate) widget: Option<ResolvedWidget>,
    pub(crate) children: Children,
    pub(crate) errors: Vec<LocalizedError>,
    pub(crate) dirty: bool,
    pub(crate) touched: bool,
    pub(crate) focused: bool,
}

impl FieldController {
    /// Arena handle.
    pub fn id(&self) -> FieldId {
        self.id
    }

    /// Handle of the enclosing controller.
    pub fn parent(&self) -> Option<FieldId> {
        self.parent
    }

    /// Current location in the form value.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// The property name, for object children.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The schema node this field edits.
    pub fn schema(&self) -> &Arc<SchemaNode> {
        &self.schema
    }

    /// Presentation hints for this field.
    pub fn hint(&self) -> &UiSchema {
        &self.hint
    }

    /// Data kind.
    pub fn kind(&self) -> SchemaKind {
        self.schema.kind()
    }

    /// Whether the parent object lists this property as required.
    pub fn required(&self) -> bool {
        self.required
    }

    /// The widget resolved at build time; `None` for containers.
    pub fn widget(&self) -> Option<&ResolvedWidget> {
        self.widget.as_ref()
    }

    /// Children of this field.
    pub fn children(&self) -> &Children {
        &self.children
    }

    /// The array bookkeeping, if this is an array field.
    pub fn array(&self) -> Option<&ArrayController> {
        match &self.children {
            Children::Array(array) => Some(array),
            _ => None,
        }
    }

    pub(crate) fn array_mut(&mut self) -> Option<&mut ArrayController> {
        match &mut self.children {
            Children::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Handles of all direct children, in display order.
    pub fn child_ids(&self) -> Vec<FieldId> {
        match &self.children {
            Children::None => Vec::new(),
            Children::Object(ids) => ids.clone(),
            Children::Array(array) => array.items.iter().map(|item| item.field).collect(),
        }
    }

    /// Errors addressed to exactly this field by the last validation.
    pub fn errors(&self) -> &[LocalizedError] {
        &self.errors
    }

    /// Whether this field has been written since the session was built.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether this field has lost focus at least once.
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Whether this field currently has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Display label: `ui:title`, then schema `title`, then property name.
    pub fn label(&self) -> &str {
        self.hint
            .title
            .as_deref()
            .or_else(|| self.schema.title())
            .or(self.name.as_deref())
            .unwrap_or("")
    }

    /// Description: `ui:description`, then schema `description`.
    pub fn description(&self) -> Option<&str> {
        self.hint
            .description
            .as_deref()
            .or_else(|| self.schema.description())
    }

    /// Whether the field template should print the label.
    ///
    /// Containers print their own titles and checkboxes their own label.
    pub fn display_label(&self) -> bool {
        let own_label = !self.kind().is_primitive()
            || self
                .widget
                .as_ref()
                .is_some_and(|w| w.name == "CheckboxWidget");
        !own_label && self.hint.options.label.unwrap_or(true)
    }
}

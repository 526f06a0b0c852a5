//! # Form Events
//!
//! User interaction arrives as [`FormEvent`] values. Renderers receive
//! ready-made events in their props (the "callbacks" of a field) and hand
//! them back to [`FormSession::dispatch`](crate::FormSession::dispatch)
//! when the user acts. Every event is one discrete, non-overlapping step.

use serde_json::Value;

use formkit_core::{FieldId, ItemKey};

/// One user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// A leaf field's value changed.
    Change {
        /// The leaf field.
        field: FieldId,
        /// The new raw input value.
        value: Value,
    },
    /// A field lost focus.
    Blur {
        /// The field.
        field: FieldId,
    },
    /// A field gained focus.
    Focus {
        /// The field.
        field: FieldId,
    },
    /// The add button of an array was pressed.
    AddItem {
        /// The array field.
        array: FieldId,
    },
    /// The remove button of an array item was pressed.
    RemoveItem {
        /// The array field.
        array: FieldId,
        /// The stable key of the item.
        key: ItemKey,
    },
}

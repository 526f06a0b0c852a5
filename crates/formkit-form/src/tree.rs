//! # Field Tree
//!
//! Arena of [`FieldController`]s indexed by [`FieldId`]. Slots are never
//! reused: a handle to a removed subtree stays dead for the lifetime of
//! the session. A pointer index maps every live controller's current JSON
//! Pointer to its handle so that validation errors can be routed by the
//! location the validator reports. A location below any controller (an
//! `additionalProperties` value, say) is owned by the nearest live
//! ancestor, so no violation goes unannotated.

use std::collections::HashMap;

use formkit_core::{FieldId, FieldPath};
use formkit_schema::LocalizedError;

use crate::field::{Children, FieldController};

/// The controller arena of one session.
#[derive(Debug, Clone, Default)]
pub struct FieldTree {
    nodes: Vec<Option<FieldController>>,
    index: HashMap<String, FieldId>,
}

impl FieldTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Handle of the root controller.
    pub fn root(&self) -> FieldId {
        FieldId(0)
    }

    /// The live controller behind `id`.
    pub fn get(&self, id: FieldId) -> Option<&FieldController> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: FieldId) -> Option<&mut FieldController> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// The live controller at `path`.
    pub fn find(&self, path: &FieldPath) -> Option<&FieldController> {
        self.find_pointer(&path.to_pointer())
    }

    /// The live controller whose current path renders to `pointer`.
    pub fn find_pointer(&self, pointer: &str) -> Option<&FieldController> {
        self.index.get(pointer).and_then(|id| self.get(*id))
    }

    /// The nearest live controller at or above `pointer`.
    pub fn owner_of(&self, pointer: &str) -> Option<&FieldController> {
        self.owner_id(pointer).and_then(|id| self.get(id))
    }

    fn owner_id(&self, pointer: &str) -> Option<FieldId> {
        let mut current = pointer;
        loop {
            if let Some(id) = self.index.get(current) {
                return Some(*id);
            }
            let (parent, _) = current.rsplit_once('/')?;
            current = parent;
        }
    }

    /// Number of live controllers.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the tree has no live controllers.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Handle the next inserted controller will receive.
    pub(crate) fn next_id(&self) -> FieldId {
        FieldId(self.nodes.len())
    }

    pub(crate) fn insert(&mut self, controller: FieldController) -> FieldId {
        let id = self.next_id();
        debug_assert_eq!(controller.id, id);
        self.index.insert(controller.path.to_pointer(), id);
        self.nodes.push(Some(controller));
        id
    }

    /// Handles of `id` and all its descendants, pre-order.
    pub fn subtree(&self, id: FieldId) -> Vec<FieldId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            out.push(current);
            let mut children = node.child_ids();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Destroy `id` and its descendants, discarding their errors.
    ///
    /// Returns the number of controllers destroyed.
    pub(crate) fn remove_subtree(&mut self, id: FieldId) -> usize {
        let doomed = self.subtree(id);
        for field in &doomed {
            if let Some(node) = self.nodes.get_mut(field.0).and_then(Option::take) {
                self.index.remove(&node.path.to_pointer());
            }
        }
        doomed.len()
    }

    /// Re-address the subtrees rooted at `roots` after a preceding array
    /// item was removed: the segment at `depth` of every path becomes the
    /// new index given for its root.
    pub(crate) fn shift_items(&mut self, depth: usize, roots: &[(FieldId, usize)]) {
        let mut moved = Vec::new();
        for (root, new_index) in roots {
            for field in self.subtree(*root) {
                if let Some(node) = self.get_mut(field) {
                    let old = node.path.to_pointer();
                    node.path = node.path.with_index_at(depth, *new_index);
                    let pointer = node.path.to_pointer();
                    for error in &mut node.errors {
                        if let Some(rest) = error.path.strip_prefix(old.as_str()) {
                            error.path = format!("{pointer}{rest}");
                        }
                    }
                    moved.push((field, old));
                }
            }
        }
        for (_, old) in &moved {
            self.index.remove(old);
        }
        for (field, _) in moved {
            if let Some(node) = self.get(field) {
                let pointer = node.path.to_pointer();
                self.index.insert(pointer, field);
            }
        }
    }

    /// Drop every error on every controller.
    pub(crate) fn clear_errors(&mut self) {
        for node in self.nodes.iter_mut().flatten() {
            node.errors.clear();
        }
    }

    /// Replace all field errors with `errors`.
    ///
    /// Each error goes to the controller at its path, or to the nearest
    /// live ancestor when no controller sits exactly there. Returns the
    /// number delivered; only an empty tree delivers fewer than given.
    pub(crate) fn distribute_errors(&mut self, errors: Vec<LocalizedError>) -> usize {
        self.clear_errors();
        let mut delivered = 0;
        for error in errors {
            let Some(id) = self.owner_id(&error.path) else {
                tracing::debug!(path = %error.path, "no live field for error");
                continue;
            };
            if self.index.get(&error.path) != Some(&id) {
                tracing::debug!(path = %error.path, "error attached to nearest live ancestor");
            }
            if let Some(node) = self.get_mut(id) {
                node.errors.push(error);
                delivered += 1;
            }
        }
        delivered
    }

    /// All errors currently on the tree, in display order.
    pub fn errors(&self) -> Vec<LocalizedError> {
        self.subtree(self.root())
            .into_iter()
            .filter_map(|id| self.get(id))
            .flat_map(|node| node.errors.iter().cloned())
            .collect()
    }

    /// Whether `id` is a live controller whose children are empty.
    pub(crate) fn is_leaf(&self, id: FieldId) -> bool {
        self.get(id)
            .is_some_and(|node| matches!(node.children, Children::None))
    }
}

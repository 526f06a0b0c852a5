//! # Form Value Access
//!
//! Path-addressed reads and writes on a `serde_json::Value` form value.
//!
//! Writes materialize missing containers along the way: a property step
//! through a non-object turns it into an empty object, an index step
//! through a non-array turns it into an array padded with `null`.
//! Writing `None` makes the location absent (the key is removed from its
//! object; an array slot becomes `null` since removing it would shift
//! its siblings).

use serde_json::{Map, Value};

use crate::path::{FieldPath, PathSegment};

/// Read the value at `path`, or `None` if any step is absent.
pub fn value_at<'a>(root: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = root;
    for seg in path.segments() {
        current = match (seg, current) {
            (PathSegment::Property(name), Value::Object(map)) => map.get(name)?,
            (PathSegment::Index(i), Value::Array(items)) => items.get(*i)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write `value` at `path`, creating intermediate containers as needed.
///
/// Returns the previous value at that location, if there was one.
pub fn write_at(root: &mut Value, path: &FieldPath, value: Option<Value>) -> Option<Value> {
    let Some((last, parents)) = path.segments().split_last() else {
        let previous = std::mem::replace(root, value.unwrap_or(Value::Null));
        return Some(previous);
    };

    let mut current = root;
    for seg in parents {
        current = step_mut(current, seg)?;
    }

    match last {
        PathSegment::Property(name) => {
            let map = ensure_object(current)?;
            match value {
                Some(v) => map.insert(name.clone(), v),
                None => map.shift_remove(name),
            }
        }
        PathSegment::Index(i) => {
            let slot = ensure_array(current, *i)?.get_mut(*i)?;
            Some(std::mem::replace(slot, value.unwrap_or(Value::Null)))
        }
    }
}

/// Remove the location at `path` entirely.
///
/// For an array index the element is removed and later elements shift
/// down by one. Returns the removed value, or `None` if nothing was there.
pub fn remove_at(root: &mut Value, path: &FieldPath) -> Option<Value> {
    let (last, parents) = path.segments().split_last()?;
    let parent_path = FieldPath::from_segments(parents.to_vec());
    let parent = value_at_mut(root, &parent_path)?;
    match (last, parent) {
        (PathSegment::Property(name), Value::Object(map)) => map.shift_remove(name),
        (PathSegment::Index(i), Value::Array(items)) if *i < items.len() => Some(items.remove(*i)),
        _ => None,
    }
}

fn value_at_mut<'a>(root: &'a mut Value, path: &FieldPath) -> Option<&'a mut Value> {
    let mut current = root;
    for seg in path.segments() {
        current = match (seg, current) {
            (PathSegment::Property(name), Value::Object(map)) => map.get_mut(name)?,
            (PathSegment::Index(i), Value::Array(items)) => items.get_mut(*i)?,
            _ => return None,
        };
    }
    Some(current)
}

fn step_mut<'a>(current: &'a mut Value, seg: &PathSegment) -> Option<&'a mut Value> {
    match seg {
        PathSegment::Property(name) => Some(
            ensure_object(current)?
                .entry(name.clone())
                .or_insert_with(|| Value::Object(Map::new())),
        ),
        PathSegment::Index(i) => ensure_array(current, *i)?.get_mut(*i),
    }
}

fn ensure_object(value: &mut Value) -> Option<&mut Map<String, Value>> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    value.as_object_mut()
}

/// Turn `value` into an array long enough to hold `index`.
fn ensure_array(value: &mut Value, index: usize) -> Option<&mut Vec<Value>> {
    if !value.is_array() {
        *value = Value::Array(Vec::new());
    }
    let items = value.as_array_mut()?;
    if items.len() <= index {
        items.resize(index + 1, Value::Null);
    }
    Some(items)
}

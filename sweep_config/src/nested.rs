//! Helpers translating between flat path assignments and nested JSON objects.

use serde_json::{Map, Value};

/// Write `value` at `segments` below `target`, creating intermediate objects.
///
/// Non-object intermediates are replaced by empty objects. Callers guarantee
/// that no two assignments overlap, so nothing previously written is lost.
pub(crate) fn insert(target: &mut Map<String, Value>, segments: &[String], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut node = target;
    for segment in parents {
        let entry = node
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Some(child) = entry.as_object_mut() else {
            return;
        };
        node = child;
    }
    node.insert(last.clone(), value);
}

/// Remove and return the value at `segments`, if present.
pub(crate) fn remove(target: &mut Value, segments: &[String]) -> Option<Value> {
    let (last, parents) = segments.split_last()?;
    let mut node = target;
    for segment in parents {
        node = node.as_object_mut()?.get_mut(segment)?;
    }
    node.as_object_mut()?.remove(last)
}

/// Borrow the value at `segments`, if present.
pub(crate) fn get<'a>(target: &'a Value, segments: &[String]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(target, |node, segment| node.as_object()?.get(segment))
}

/// Flatten a JSON object into `(segments, leaf)` pairs in the map's
/// iteration order: sorted by key, since `serde_json` is used without
/// `preserve_order`.
///
/// Nested objects are descended into; every other value, including an empty
/// object, is a leaf.
pub(crate) fn flatten(map: &Map<String, Value>) -> Vec<(Vec<String>, Value)> {
    let mut out = Vec::new();
    flatten_into(map, &mut Vec::new(), &mut out);
    out
}

fn flatten_into(
    map: &Map<String, Value>,
    prefix: &mut Vec<String>,
    out: &mut Vec<(Vec<String>, Value)>,
) {
    for (key, value) in map {
        prefix.push(key.clone());
        match value {
            Value::Object(child) if !child.is_empty() => flatten_into(child, prefix, out),
            _ => out.push((prefix.clone(), value.clone())),
        }
        prefix.pop();
    }
}

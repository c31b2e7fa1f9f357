//! Canonicalization of request parameter trees.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Flat parameter set, keyed by dotted path such as `Filters.0.Values.1`.
///
/// Keys are kept in byte order so iteration already matches the order the
/// legacy signer requires.
pub type FlatParams = BTreeMap<String, String>;

/// Flatten a parameter tree into dotted keys.
///
/// - Mapping keys and sequence indices both extend the path with `.<key>`.
/// - Null values are dropped, never encoded as `"null"` or an empty string.
/// - Empty mappings and sequences contribute nothing.
/// - A scalar root has no key and yields an empty set.
///
/// If two paths collapse into the same key (a literal key containing a
/// dot), the one visited last wins.
pub fn flatten(tree: &Value) -> FlatParams {
    let mut params = FlatParams::new();
    flatten_children(tree, "", &mut params);
    params
}

fn flatten_children(value: &Value, prefix: &str, params: &mut FlatParams) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten_value(format!("{prefix}{k}"), v, params);
            }
        }
        Value::Array(items) => {
            for (idx, v) in items.iter().enumerate() {
                flatten_value(format!("{prefix}{idx}"), v, params);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

fn flatten_value(key: String, value: &Value, params: &mut FlatParams) {
    match value {
        Value::Null => {}
        Value::Object(_) | Value::Array(_) => {
            let prefix = format!("{key}.");
            flatten_children(value, &prefix, params)
        }
        Value::Bool(v) => {
            params.insert(key, v.to_string());
        }
        Value::Number(v) => {
            params.insert(key, v.to_string());
        }
        Value::String(v) => {
            params.insert(key, v.clone());
        }
    }
}

/// Remove null members from every mapping in the tree.
///
/// Sequences keep their length: a null element of a sequence is preserved
/// so positions of the remaining elements do not shift.
pub fn strip_nulls(tree: &Value) -> Value {
    match tree {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), strip_nulls(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(strip_nulls).collect()),
        v => v.clone(),
    }
}

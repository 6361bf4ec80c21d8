//! Structural diff between current and desired values
//!
//! Mappings are compared key by key, recursively and independent of order.
//! A missing key is the same as an absent value, so `{}` and a missing
//! mapping never differ.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `{old, new}` pair reported in a state result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub old: Value,
    pub new: Value,
}

impl Change {
    pub fn new(old: Value, new: Value) -> Self {
        Self { old, new }
    }
}

/// Differences between `old` and `new`, or `None` when they match
///
/// For mappings, only differing keys are reported: `old` holds the current
/// values of keys that changed or disappeared, `new` the desired values of
/// keys that changed or appeared.
pub fn deep_diff(old: &Value, new: &Value) -> Option<Change> {
    match (as_object(old), as_object(new)) {
        (Some(old_map), Some(new_map)) => diff_maps(&old_map, &new_map),
        _ if old == new => None,
        _ => Some(Change::new(old.clone(), new.clone())),
    }
}

fn as_object(value: &Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map.clone()),
        Value::Null => Some(Map::new()),
        _ => None,
    }
}

fn diff_maps(old: &Map<String, Value>, new: &Map<String, Value>) -> Option<Change> {
    let mut removed = Map::new();
    let mut added = Map::new();

    for (key, old_value) in old {
        match new.get(key) {
            None | Some(Value::Null) if !old_value.is_null() => {
                removed.insert(key.clone(), old_value.clone());
            }
            Some(new_value) => {
                if let Some(change) = deep_diff(old_value, new_value) {
                    removed.insert(key.clone(), change.old);
                    added.insert(key.clone(), change.new);
                }
            }
            None => {}
        }
    }

    for (key, new_value) in new {
        if !old.contains_key(key) && !new_value.is_null() {
            added.insert(key.clone(), new_value.clone());
        }
    }

    if removed.is_empty() && added.is_empty() {
        return None;
    }
    Some(Change::new(Value::Object(removed), Value::Object(added)))
}

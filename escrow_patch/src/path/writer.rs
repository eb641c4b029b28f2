//! Leaf assignment along a path, creating intermediates as needed

use serde_json::{Map, Value};
use tracing::debug;

use super::FieldPath;

/// Set the value at `path` inside `target`
///
/// Missing or `null` intermediates become empty objects. An intermediate
/// holding a scalar is replaced by an object. Arrays are entered by numeric
/// index; an index at or past the length grows the array, padding with
/// `null`. Everything off the path is left untouched.
pub fn assign(target: &mut Value, path: &FieldPath, value: Value) {
    let segments: Vec<&str> = path.segments().collect();
    assign_segments(target, &segments, value);
}

fn assign_segments(current: &mut Value, segments: &[&str], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *current = value;
        return;
    };

    if let Value::Array(items) = current
        && let Ok(index) = head.parse::<usize>()
    {
        if index >= items.len() {
            if index > items.len() {
                debug!("padding array of {} with null up to index {index}", items.len());
            }
            items.resize(index + 1, Value::Null);
        }
        if let Some(item) = items.get_mut(index) {
            assign_segments(item, rest, value);
        }
        return;
    }

    if !current.is_object() {
        if !current.is_null() {
            debug!("replacing non-object {current} with an object to write '{head}'");
        }
        *current = Value::Object(Map::new());
    }
    if let Value::Object(map) = current {
        let child = map.entry((*head).to_string()).or_insert(Value::Null);
        assign_segments(child, rest, value);
    }
}

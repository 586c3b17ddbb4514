//! Path accessor
//!
//! Pure get/set over a `serde_json::Value` tree. `set` takes the root by
//! value and hands back the new root, so callers never share hidden state.

use serde_json::{Map, Value};

use crate::error::{JsonDbError, Result};

use super::{JsonPath, PathSegment};

/// Get the subtree at `path`
///
/// Returns `None` when any step is missing or lands on a non-container.
/// The root path returns `root` itself.
pub fn get<'a>(root: &'a Value, path: &JsonPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |current, segment| match (current, segment) {
            (Value::Object(map), segment) => map.get(&segment.as_key()),
            (Value::Array(items), PathSegment::Index(idx)) => items.get(*idx),
            _ => None,
        })
}

/// Furthest an index may reach past the end of an array when writing
pub const MAX_INDEX_GAP: usize = 10_000;

/// Set (or, with `None`, delete) the subtree at `path`
///
/// Missing or non-container intermediates are replaced by `{}` when the next
/// segment is a key and `[]` when it is an index. Writing past the end of an
/// array pads it with nulls, up to [`MAX_INDEX_GAP`] slots; further than that
/// fails with `IndexOutOfRange` and the consumed tree is dropped. Deleting an
/// array index removes the element.
///
/// The root path replaces the whole tree (`None` yields `null`); callers that
/// need the root to stay a container must check before calling.
pub fn set(root: Value, path: &JsonPath, value: Option<Value>) -> Result<Value> {
    if path.is_root() {
        return Ok(value.unwrap_or(Value::Null));
    }
    let mut root = root;
    assign(&mut root, path.segments(), value)?;
    Ok(root)
}

fn assign(current: &mut Value, segments: &[PathSegment], value: Option<Value>) -> Result<()> {
    let Some((segment, rest)) = segments.split_first() else {
        return Ok(());
    };

    if !rest.is_empty() {
        return assign(slot(current, segment)?, rest, value);
    }

    match value {
        Some(value) => *slot(current, segment)? = value,
        None => remove(current, segment),
    }
    Ok(())
}

/// Mutable slot for `segment` under `current`, created as `null` if missing
fn slot<'a>(current: &'a mut Value, segment: &PathSegment) -> Result<&'a mut Value> {
    ensure_container(current, segment);
    match (current, segment) {
        (Value::Array(items), PathSegment::Index(idx)) => {
            let idx = *idx;
            if idx >= items.len() {
                let new_len = idx
                    .checked_add(1)
                    .filter(|&n| n - items.len() <= MAX_INDEX_GAP)
                    .ok_or(JsonDbError::IndexOutOfRange {
                        index: idx,
                        len: items.len(),
                    })?;
                items.resize(new_len, Value::Null);
            }
            Ok(&mut items[idx])
        }
        (Value::Object(map), segment) => Ok(map.entry(segment.as_key()).or_insert(Value::Null)),
        // ensure_container leaves only the two shapes above
        (other, _) => Ok(other),
    }
}

fn remove(current: &mut Value, segment: &PathSegment) {
    ensure_container(current, segment);
    match (current, segment) {
        (Value::Object(map), segment) => {
            map.shift_remove(&segment.as_key());
        }
        (Value::Array(items), PathSegment::Index(idx)) => {
            if *idx < items.len() {
                items.remove(*idx);
            }
        }
        _ => {}
    }
}

/// Objects accept any segment (indices become decimal keys); arrays only
/// accept indices. Anything else is overwritten with a fresh container.
fn ensure_container(current: &mut Value, segment: &PathSegment) {
    let usable = matches!(
        (&*current, segment),
        (Value::Object(_), _) | (Value::Array(_), PathSegment::Index(_))
    );
    if !usable {
        *current = match segment {
            PathSegment::Key(_) => Value::Object(Map::new()),
            PathSegment::Index(_) => Value::Array(Vec::new()),
        };
    }
}

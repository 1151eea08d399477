use serde_json::Value;

use crate::util::array_index;
use crate::JsonPointerError;

/// Get a value from a JSON document by path.
///
/// A step against an object is a key lookup; against an array it must be a
/// canonical index. The type of the parent decides, so `"0"` against an
/// object is just the key `"0"`.
pub fn get<'a>(val: &'a Value, path: &[String]) -> Result<&'a Value, JsonPointerError> {
    let mut current = val;
    for path_step in path {
        current = match current {
            Value::Object(map) => map.get(path_step),
            Value::Array(arr) => array_index(path_step).and_then(|idx| arr.get(idx)),
            _ => None,
        }
        .ok_or_else(|| JsonPointerError::not_found(path))?;
    }
    Ok(current)
}

/// Get a mutable reference to a value in a JSON document by path.
///
/// Returns `None` if the path doesn't exist.
pub fn get_mut<'a>(val: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    let mut current = val;
    for path_step in path {
        current = match current {
            Value::Object(map) => map.get_mut(path_step)?,
            Value::Array(arr) => arr.get_mut(array_index(path_step)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Check whether `path` resolves in `val`. Never fails.
pub fn has(val: &Value, path: &[String]) -> bool {
    get(val, path).is_ok()
}

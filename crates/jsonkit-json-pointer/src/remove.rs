use serde_json::Value;

use crate::get::get_mut;
use crate::util::array_index;
use crate::JsonPointerError;

/// Remove the value at `path` in place and return it.
///
/// Removing from an array shifts the following elements down so indices stay
/// dense. The root itself cannot be removed.
pub fn remove_mut(doc: &mut Value, path: &[String]) -> Result<Value, JsonPointerError> {
    let Some((last, parents)) = path.split_last() else {
        return Err(JsonPointerError::not_found(path));
    };
    let parent = get_mut(doc, parents).ok_or_else(|| JsonPointerError::not_found(path))?;
    let removed = match parent {
        Value::Object(map) => map.shift_remove(last),
        Value::Array(arr) => match array_index(last) {
            Some(idx) if idx < arr.len() => Some(arr.remove(idx)),
            _ => None,
        },
        _ => None,
    };
    removed.ok_or_else(|| JsonPointerError::not_found(path))
}

/// Non-mutating [`remove_mut`]: works on a copy and returns it.
pub fn remove(doc: &Value, path: &[String]) -> Result<Value, JsonPointerError> {
    let mut out = doc.clone();
    remove_mut(&mut out, path)?;
    Ok(out)
}

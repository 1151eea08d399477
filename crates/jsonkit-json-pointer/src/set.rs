use serde_json::{Map, Value};

use crate::types::SetOptions;
use crate::util::array_index;
use crate::JsonPointerError;

/// Set the value at `path` in place, returning the value it displaced.
///
/// All steps but the last must resolve, unless `options.create_missing` is on,
/// in which case a missing object key becomes an empty object. The last step
/// inserts into an object; on an array `-` appends, an existing index is
/// overwritten and the index equal to the length appends.
pub fn set_mut(
    doc: &mut Value,
    path: &[String],
    value: Value,
    options: &SetOptions,
) -> Result<Option<Value>, JsonPointerError> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(Some(std::mem::replace(doc, value)));
    };

    let mut current = doc;
    for path_step in parents {
        current = match current {
            Value::Object(map) => {
                if options.create_missing {
                    Some(
                        map.entry(path_step.clone())
                            .or_insert_with(|| Value::Object(Map::new())),
                    )
                } else {
                    map.get_mut(path_step)
                }
            }
            Value::Array(arr) => array_index(path_step).and_then(move |idx| arr.get_mut(idx)),
            _ => None,
        }
        .ok_or_else(|| JsonPointerError::not_found(path))?;
    }

    match current {
        Value::Object(map) => Ok(map.insert(last.clone(), value)),
        Value::Array(arr) => {
            if last == "-" {
                arr.push(value);
                return Ok(None);
            }
            match array_index(last) {
                Some(idx) if idx < arr.len() => Ok(Some(std::mem::replace(&mut arr[idx], value))),
                Some(idx) if idx == arr.len() => {
                    arr.push(value);
                    Ok(None)
                }
                _ => Err(JsonPointerError::not_found(path)),
            }
        }
        _ => Err(JsonPointerError::not_found(path)),
    }
}

/// Non-mutating [`set_mut`]: works on a copy and returns it.
///
/// `doc` is left untouched whether or not the call succeeds.
pub fn set(
    doc: &Value,
    path: &[String],
    value: Value,
    options: &SetOptions,
) -> Result<Value, JsonPointerError> {
    let mut out = doc.clone();
    set_mut(&mut out, path, value, options)?;
    Ok(out)
}

//! Explicit document patches.
//!
//! Fix routines never edit a document in place; they emit patches with
//! concrete JSON-pointer targets, which keeps each routine independently
//! testable and makes idempotence structural: `SetIfAbsent` is a no-op
//! when the target already exists, `Remove` when it does not.

use serde_json::Value;

/// One mutation against a resource document.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Insert `value` at `pointer` only when the target is currently
    /// absent. Missing intermediate objects are created; traversing a
    /// non-object (or a missing array index) is an error.
    SetIfAbsent { pointer: String, value: Value },
    /// Remove the value at `pointer` if present.
    Remove { pointer: String },
}

impl Patch {
    pub fn set_if_absent(pointer: impl Into<String>, value: Value) -> Self {
        Self::SetIfAbsent {
            pointer: pointer.into(),
            value,
        }
    }

    pub fn remove(pointer: impl Into<String>) -> Self {
        Self::Remove {
            pointer: pointer.into(),
        }
    }

    /// Apply this patch. Returns whether the document changed.
    pub fn apply(&self, doc: &mut Value) -> Result<bool, String> {
        match self {
            Self::SetIfAbsent { pointer, value } => {
                let (parent, key) = split_pointer(pointer)?;
                let target = descend_creating(doc, parent)?;
                let object = target.as_object_mut().ok_or_else(|| {
                    format!("patch target '{parent}' is not an object")
                })?;
                if object.contains_key(key) {
                    Ok(false)
                } else {
                    object.insert(key.to_string(), value.clone());
                    Ok(true)
                }
            }
            Self::Remove { pointer } => {
                let (parent, key) = split_pointer(pointer)?;
                match doc.pointer_mut(parent) {
                    Some(Value::Object(object)) => Ok(object.remove(key).is_some()),
                    _ => Ok(false),
                }
            }
        }
    }
}

/// Apply a patch set. Returns whether any patch changed the document;
/// the first patch error aborts the set.
pub fn apply_all(doc: &mut Value, patches: &[Patch]) -> Result<bool, String> {
    let mut changed = false;
    for patch in patches {
        changed |= patch.apply(doc)?;
    }
    Ok(changed)
}

fn split_pointer(pointer: &str) -> Result<(&str, &str), String> {
    if !pointer.starts_with('/') {
        return Err(format!("invalid patch pointer '{pointer}'"));
    }
    let split = pointer.rfind('/').unwrap_or(0);
    let key = &pointer[split + 1..];
    if key.is_empty() {
        return Err(format!("invalid patch pointer '{pointer}'"));
    }
    Ok((&pointer[..split], key))
}

/// Walk a parent pointer, creating missing intermediate objects. Array
/// indices must already exist; patches target concrete elements.
fn descend_creating<'a>(doc: &'a mut Value, parent: &str) -> Result<&'a mut Value, String> {
    let mut current = doc;
    for token in parent.split('/').skip(1) {
        let token = token.replace("~1", "/").replace("~0", "~");
        current = match current {
            Value::Array(items) => {
                let index: usize = token
                    .parse()
                    .map_err(|_| format!("expected array index, got '{token}'"))?;
                items
                    .get_mut(index)
                    .ok_or_else(|| format!("array index {index} out of bounds"))?
            }
            Value::Object(object) => object.entry(token).or_insert(Value::Object(Default::default())),
            other => {
                return Err(format!(
                    "cannot traverse non-object value {other} at '{token}'"
                ))
            }
        };
    }
    Ok(current)
}

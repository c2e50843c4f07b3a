//! Path resolution against a JSON document.

use serde_json::Value;

use super::path::{FieldPath, Segment};

/// The outcome of resolving a [`FieldPath`] against a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// A plain path: the value at the path, or `None` if any hop is
    /// missing or traverses a non-object.
    Single(Option<&'a Value>),
    /// A projected path: the per-element values of the suffix path,
    /// one entry per array element. Empty when the prefix is missing,
    /// not an array, or the array is empty.
    Projected(Vec<Option<&'a Value>>),
}

impl FieldPath {
    /// Resolve this path against `doc`.
    pub fn resolve<'a>(&self, doc: &'a Value) -> Resolved<'a> {
        let segments = self.segments();
        let mut current = Some(doc);

        for (i, seg) in segments.iter().enumerate() {
            if seg.projected {
                let array = current
                    .and_then(|v| v.get(&seg.key))
                    .and_then(Value::as_array);
                let suffix = &segments[i + 1..];
                let elements = match array {
                    Some(items) => items
                        .iter()
                        .map(|item| walk(item, suffix))
                        .collect(),
                    None => Vec::new(),
                };
                return Resolved::Projected(elements);
            }
            current = current.and_then(|v| v.get(&seg.key));
        }

        Resolved::Single(current)
    }
}

fn walk<'a>(value: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    let mut current = Some(value);
    for seg in segments {
        current = current.and_then(|v| v.get(&seg.key));
    }
    current
}

/// Coerce a resolved value to a string for substring and regex tests.
/// Strings pass through verbatim; null and missing coerce to the empty
/// string; composites render as compact JSON.
pub fn coerce_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

//! Field-path parsing.

use crate::errors::PathError;

/// One dot-separated segment of a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub key: String,
    /// True when the segment carries the `[*]` array projection suffix.
    pub projected: bool,
}

/// A parsed dotted field path, e.g.
/// `spec.template.spec.containers[*].securityContext.privileged`.
///
/// At most one segment may project; a second projection is a parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = Vec::new();
        let mut saw_projection = false;
        for raw in path.split('.') {
            if raw.is_empty() {
                return Err(PathError::EmptySegment {
                    path: path.to_string(),
                });
            }
            let (key, projected) = match raw.strip_suffix("[*]") {
                Some(prefix) => (prefix, true),
                None => (raw, false),
            };
            if key.is_empty() || key.contains('[') || key.contains(']') {
                return Err(PathError::MalformedSegment {
                    path: path.to_string(),
                    segment: raw.to_string(),
                });
            }
            if projected {
                if saw_projection {
                    return Err(PathError::MultipleProjections {
                        path: path.to_string(),
                    });
                }
                saw_projection = true;
            }
            segments.push(Segment {
                key: key.to_string(),
                projected,
            });
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when the path contains a `[*]` projection segment.
    pub fn projects(&self) -> bool {
        self.segments.iter().any(|s| s.projected)
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&seg.key)?;
            if seg.projected {
                f.write_str("[*]")?;
            }
        }
        Ok(())
    }
}

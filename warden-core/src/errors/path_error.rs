//! Field-path parse errors.

/// Errors produced when parsing a condition's field path.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("field path is empty")]
    Empty,

    #[error("empty segment in field path '{path}'")]
    EmptySegment { path: String },

    #[error("malformed segment '{segment}' in field path '{path}'")]
    MalformedSegment { path: String, segment: String },

    #[error("field path '{path}' contains more than one [*] projection")]
    MultipleProjections { path: String },
}

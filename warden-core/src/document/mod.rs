//! Document accessor: field-path resolution over nested JSON documents.
//!
//! Resource documents are loosely-typed `serde_json::Value` trees. This
//! module resolves dotted field paths (with at most one `[*]` array
//! projection), coerces values for typed comparisons, and evaluates a
//! single [`Condition`](crate::rules::Condition) against a document.

pub mod eval;
pub mod path;
pub mod quantity;
pub mod resolve;

pub use eval::{evaluate_condition, ConditionOutcome};
pub use path::FieldPath;
pub use quantity::parse_quantity;
pub use resolve::{coerce_string, Resolved};

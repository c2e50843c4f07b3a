//! Evaluation: runs the effective rule set against one resource and
//! classifies failures into blocking violations vs warnings.

pub mod evaluator;
pub mod types;

pub use evaluator::{evaluate_resource, ResourceIdentity};
pub use types::{EvaluationResult, EvaluationSummary, Violation};

//! Compliance report types.

use serde::{Deserialize, Serialize};

use crate::evaluation::EvaluationResult;

/// A point-in-time compliance report over a scope. Created per
/// aggregation call; never persisted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    /// Unix seconds.
    pub timestamp: u64,
    /// Cluster identity, as configured on the engine.
    pub cluster: String,
    /// The namespace scanned, or `None` for the whole fleet.
    pub scope: Option<String>,
    /// Passed rules as a percentage of total applicable rules, rounded
    /// to two decimals. No applicable rules means vacuous compliance
    /// (100.0).
    pub overall_compliance: f64,
    /// The aggregated evaluation across every resource in scope.
    pub summary: EvaluationResult,
    pub recommendations: Vec<String>,
    pub resources_evaluated: usize,
    /// Excluded namespaces plus resources that could not be evaluated.
    pub resources_skipped: usize,
}

//! Evaluation result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use warden_core::rules::{Category, Severity};

/// One recorded condition failure. Immutable once created; the core
/// never persists these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub rule_id: String,
    pub rule_name: String,
    pub severity: Severity,
    pub category: Category,
    pub resource_kind: String,
    pub resource_name: String,
    pub namespace: String,
    pub message: String,
    /// The condition's field path.
    pub field: String,
    /// The offending value, when one was resolved.
    pub observed: Option<Value>,
    /// The comparator the condition expected, when meaningful.
    pub suggested: Option<Value>,
    pub can_auto_fix: bool,
    /// Unix seconds.
    pub timestamp: u64,
}

/// Counters over one evaluation (or an aggregate of many).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationSummary {
    /// Scope-matching enabled rules considered.
    pub total_rules: usize,
    pub passed_rules: usize,
    /// Distinct rule ids appearing in either bucket.
    pub failed_rules: usize,
    /// Tallies count individual records, not distinct rules.
    pub violations_by_severity: BTreeMap<Severity, usize>,
    pub violations_by_category: BTreeMap<Category, usize>,
}

impl EvaluationSummary {
    pub(crate) fn tally(&mut self, severity: Severity, category: Category) {
        *self.violations_by_severity.entry(severity).or_insert(0) += 1;
        *self.violations_by_category.entry(category).or_insert(0) += 1;
    }
}

/// The outcome of evaluating one resource (or an aggregate over many).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// True iff `violations` is empty. Warnings never affect this.
    pub passed: bool,
    pub violations: Vec<Violation>,
    pub warnings: Vec<Violation>,
    pub summary: EvaluationSummary,
}

impl EvaluationResult {
    /// An empty, passing result (the contribution of a resource that
    /// could not be evaluated).
    pub fn empty() -> Self {
        Self {
            passed: true,
            violations: Vec::new(),
            warnings: Vec::new(),
            summary: EvaluationSummary::default(),
        }
    }

    /// Fold another result into this one: record lists concatenate,
    /// summary counters sum, `passed` stays consistent with the
    /// violations bucket.
    pub fn merge(&mut self, other: EvaluationResult) {
        self.violations.extend(other.violations);
        self.warnings.extend(other.warnings);
        self.summary.total_rules += other.summary.total_rules;
        self.summary.passed_rules += other.summary.passed_rules;
        self.summary.failed_rules += other.summary.failed_rules;
        for (severity, count) in other.summary.violations_by_severity {
            *self
                .summary
                .violations_by_severity
                .entry(severity)
                .or_insert(0) += count;
        }
        for (category, count) in other.summary.violations_by_category {
            *self
                .summary
                .violations_by_category
                .entry(category)
                .or_insert(0) += count;
        }
        self.passed = self.violations.is_empty();
    }

    /// Records in both buckets flagged auto-fixable.
    pub fn auto_fixable_count(&self) -> usize {
        self.violations
            .iter()
            .chain(self.warnings.iter())
            .filter(|v| v.can_auto_fix)
            .count()
    }
}

impl Default for EvaluationResult {
    fn default() -> Self {
        Self::empty()
    }
}

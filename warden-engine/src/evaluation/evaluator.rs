//! The evaluator: conditions to classified violation records.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tracing::debug;

use warden_core::document::evaluate_condition;
use warden_core::rules::{Condition, Operator, PolicyRule};

use crate::enforcement::EnforcementPolicy;

use super::types::{EvaluationResult, EvaluationSummary, Violation};

/// Identity of the resource under evaluation, read from the document.
#[derive(Debug, Clone)]
pub struct ResourceIdentity {
    pub kind: String,
    pub name: String,
    pub namespace: String,
}

impl ResourceIdentity {
    pub fn from_document(resource: &Value) -> Self {
        let str_at = |v: &Value, path: &[&str], fallback: &str| -> String {
            let mut current = Some(v);
            for key in path {
                current = current.and_then(|v| v.get(key));
            }
            current
                .and_then(Value::as_str)
                .unwrap_or(fallback)
                .to_string()
        };
        Self {
            kind: str_at(resource, &["kind"], "Deployment"),
            name: str_at(resource, &["metadata", "name"], "unknown"),
            namespace: str_at(resource, &["metadata", "namespace"], "default"),
        }
    }
}

/// Evaluate one resource against its applicable rules.
///
/// Every condition of every rule is evaluated independently; each
/// failure yields one record. Bucketing is rule-scoped: a rule with at
/// least one `deny` action puts all of its failures in the blocking
/// bucket, unless the category's enforcement level downgrades it to a
/// warning. `can_auto_fix` is likewise rule-scoped.
pub fn evaluate_resource(
    resource: &Value,
    rules: &[&PolicyRule],
    policy: &EnforcementPolicy,
) -> EvaluationResult {
    let identity = ResourceIdentity::from_document(resource);
    let timestamp = now_secs();

    let mut violations = Vec::new();
    let mut warnings = Vec::new();
    let mut failed_ids: HashSet<&str> = HashSet::new();
    let mut summary = EvaluationSummary {
        total_rules: rules.len(),
        ..EvaluationSummary::default()
    };

    for rule in rules {
        let blocking = rule.is_blocking() && policy.enforcement_for(rule.category).blocks();
        for condition in &rule.conditions {
            let outcome = evaluate_condition(condition, resource);
            if outcome.satisfied {
                continue;
            }
            debug!(rule = %rule.id, field = %condition.field, "condition failed");
            failed_ids.insert(rule.id.as_str());
            summary.tally(rule.severity, rule.category);

            let record = Violation {
                rule_id: rule.id.clone(),
                rule_name: rule.name.clone(),
                severity: rule.severity,
                category: rule.category,
                resource_kind: identity.kind.clone(),
                resource_name: identity.name.clone(),
                namespace: identity.namespace.clone(),
                message: message_for(rule, condition),
                field: condition.field.clone(),
                observed: outcome.observed,
                suggested: suggested_for(condition),
                can_auto_fix: rule.auto_fixable(),
                timestamp,
            };
            if blocking {
                violations.push(record);
            } else {
                warnings.push(record);
            }
        }
    }

    summary.failed_rules = failed_ids.len();
    summary.passed_rules = summary.total_rules - summary.failed_rules;

    EvaluationResult {
        passed: violations.is_empty(),
        violations,
        warnings,
        summary,
    }
}

fn message_for(rule: &PolicyRule, condition: &Condition) -> String {
    let message = rule.primary_message();
    if !message.is_empty() {
        message.to_string()
    } else if !condition.description.is_empty() {
        format!("{}: {}", rule.name, condition.description)
    } else {
        rule.name.clone()
    }
}

/// The comparator is a meaningful suggestion for value-comparing
/// operators; existence tests have nothing to suggest.
fn suggested_for(condition: &Condition) -> Option<Value> {
    match condition.operator {
        Operator::Exists | Operator::NotExists => None,
        _ if condition.value.is_null() => None,
        _ => Some(condition.value.clone()),
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

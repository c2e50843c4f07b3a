//! Condition evaluation: operator application and projection quantifiers.

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::rules::{Condition, Operator, Quantifier};

use super::path::FieldPath;
use super::quantity::parse_quantity;
use super::resolve::{coerce_string, Resolved};

/// The outcome of evaluating one condition against one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionOutcome {
    pub satisfied: bool,
    /// For failures: the offending value, if one was resolved. With a
    /// projected path this is the first element that failed the operator.
    pub observed: Option<Value>,
}

impl ConditionOutcome {
    fn pass() -> Self {
        Self {
            satisfied: true,
            observed: None,
        }
    }

    fn fail(observed: Option<Value>) -> Self {
        Self {
            satisfied: false,
            observed,
        }
    }
}

/// Evaluate a condition against a document.
///
/// A plain path applies the operator to the single resolved value. A
/// projected path applies the operator per array element and combines
/// the results with the condition's quantifier: `all` (default, empty
/// projection passes vacuously) or `any`.
pub fn evaluate_condition(condition: &Condition, doc: &Value) -> ConditionOutcome {
    let path = match FieldPath::parse(&condition.field) {
        Ok(path) => path,
        Err(err) => {
            warn!(field = %condition.field, %err, "invalid condition field path");
            return ConditionOutcome::fail(None);
        }
    };

    match path.resolve(doc) {
        Resolved::Single(value) => {
            if operator_matches(condition.operator, value, &condition.value) {
                ConditionOutcome::pass()
            } else {
                ConditionOutcome::fail(value.cloned())
            }
        }
        Resolved::Projected(values) => {
            let mut first_failure: Option<Option<Value>> = None;
            let mut matched = 0usize;
            for value in &values {
                if operator_matches(condition.operator, *value, &condition.value) {
                    matched += 1;
                } else if first_failure.is_none() {
                    first_failure = Some(value.cloned());
                }
            }
            let satisfied = match condition.quantifier {
                Quantifier::All => matched == values.len(),
                Quantifier::Any => matched > 0,
            };
            if satisfied {
                ConditionOutcome::pass()
            } else {
                ConditionOutcome::fail(first_failure.flatten())
            }
        }
    }
}

/// Apply one operator to one resolved value.
fn operator_matches(operator: Operator, value: Option<&Value>, comparator: &Value) -> bool {
    match operator {
        Operator::Exists => is_defined(value),
        Operator::NotExists => !is_defined(value),
        Operator::Equals => value.is_some_and(|v| v == comparator),
        Operator::NotEquals => !value.is_some_and(|v| v == comparator),
        Operator::Contains => {
            is_defined(value) && coerce_string(value).contains(&coerce_string(Some(comparator)))
        }
        Operator::NotContains => {
            !(is_defined(value)
                && coerce_string(value).contains(&coerce_string(Some(comparator))))
        }
        Operator::GreaterThan => parse_quantity(value) > parse_quantity(Some(comparator)),
        Operator::LessThan => parse_quantity(value) < parse_quantity(Some(comparator)),
        Operator::RegexMatch => {
            if !is_defined(value) {
                return false;
            }
            let pattern = coerce_string(Some(comparator));
            match Regex::new(&pattern) {
                Ok(re) => re.is_match(&coerce_string(value)),
                Err(err) => {
                    warn!(%pattern, %err, "invalid regex_match pattern");
                    false
                }
            }
        }
    }
}

/// Definedness: present and non-null. `false` and `0` both count as defined.
fn is_defined(value: Option<&Value>) -> bool {
    matches!(value, Some(v) if !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn condition(field: &str, operator: Operator, value: Value) -> Condition {
        Condition {
            field: field.to_string(),
            operator,
            value,
            quantifier: Quantifier::All,
            description: String::new(),
        }
    }

    fn pod() -> Value {
        json!({
            "spec": {
                "replicas": 2,
                "template": {"spec": {"containers": [
                    {"name": "app", "image": "registry.internal/app:2.1",
                     "securityContext": {"privileged": false, "runAsUser": 0},
                     "resources": {"limits": {"cpu": "2500m"}}},
                    {"name": "sidecar", "image": "envoy:latest"}
                ]}}
            }
        })
    }

    #[test]
    fn test_exists_counts_false_and_zero_as_defined() {
        let doc = pod();
        let c = condition(
            "spec.template.spec.containers[*].securityContext.privileged",
            Operator::Exists,
            Value::Null,
        );
        // Second container has no securityContext at all, so `all` fails.
        assert!(!evaluate_condition(&c, &doc).satisfied);

        let c = Condition {
            quantifier: Quantifier::Any,
            ..c
        };
        assert!(evaluate_condition(&c, &doc).satisfied);
    }

    #[test]
    fn test_all_quantifier_is_vacuous_on_empty_projection() {
        let doc = json!({"spec": {"template": {"spec": {"containers": []}}}});
        let field = "spec.template.spec.containers[*].livenessProbe";
        let all = condition(field, Operator::Exists, Value::Null);
        assert!(evaluate_condition(&all, &doc).satisfied);

        let any = Condition {
            quantifier: Quantifier::Any,
            ..all
        };
        assert!(!evaluate_condition(&any, &doc).satisfied);
    }

    #[test]
    fn test_not_equals_passes_on_missing_value() {
        let doc = pod();
        let c = condition(
            "spec.template.spec.containers[*].securityContext.privileged",
            Operator::NotEquals,
            json!(true),
        );
        // Neither container sets privileged=true (one sets false, one has
        // no securityContext), so the universal reading passes.
        assert!(evaluate_condition(&c, &doc).satisfied);
    }

    #[test]
    fn test_contains_reports_offending_element() {
        let doc = pod();
        let c = condition(
            "spec.template.spec.containers[*].image",
            Operator::NotContains,
            json!(":latest"),
        );
        let outcome = evaluate_condition(&c, &doc);
        assert!(!outcome.satisfied);
        assert_eq!(outcome.observed, Some(json!("envoy:latest")));
    }

    #[test]
    fn test_quantity_comparison_on_cpu_limits() {
        // 2500m is not less than 2000m, so the universal reading fails
        // and reports the oversized limit.
        let doc = pod();
        let c = condition(
            "spec.template.spec.containers[*].resources.limits.cpu",
            Operator::LessThan,
            json!("2000m"),
        );
        let outcome = evaluate_condition(&c, &doc);
        assert!(!outcome.satisfied);
        assert_eq!(outcome.observed, Some(json!("2500m")));
    }

    #[test]
    fn test_greater_than_on_plain_path() {
        let doc = pod();
        let c = condition("spec.replicas", Operator::GreaterThan, json!(1));
        assert!(evaluate_condition(&c, &doc).satisfied);
        let c = condition("spec.replicas", Operator::GreaterThan, json!(2));
        assert!(!evaluate_condition(&c, &doc).satisfied);
    }

    #[test]
    fn test_regex_match_and_invalid_pattern() {
        let doc = pod();
        let c = Condition {
            quantifier: Quantifier::Any,
            ..condition(
                "spec.template.spec.containers[*].image",
                Operator::RegexMatch,
                json!(r"^registry\.internal/"),
            )
        };
        assert!(evaluate_condition(&c, &doc).satisfied);

        let bad = condition("spec.replicas", Operator::RegexMatch, json!("("));
        assert!(!evaluate_condition(&bad, &doc).satisfied);
    }

    #[test]
    fn test_malformed_field_path_fails_condition() {
        let doc = pod();
        let c = condition("a[*].b[*].c", Operator::Exists, Value::Null);
        assert!(!evaluate_condition(&c, &doc).satisfied);
    }
}

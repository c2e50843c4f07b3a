//! The compliance aggregator: evaluates every resource in a scope and
//! reduces the per-resource results into one report.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;

use warden_core::errors::StoreError;
use warden_core::rules::Category;

use crate::catalog::RuleCatalog;
use crate::enforcement::EnforcementPolicy;
use crate::evaluation::{evaluate_resource, EvaluationResult, ResourceIdentity};
use crate::store::ResourceStore;

use super::types::ComplianceReport;

/// Reduces many evaluations into one fleet- or namespace-level report.
pub struct ComplianceAggregator<'a> {
    catalog: &'a RuleCatalog,
    policy: &'a EnforcementPolicy,
    cluster: &'a str,
}

impl<'a> ComplianceAggregator<'a> {
    pub fn new(catalog: &'a RuleCatalog, policy: &'a EnforcementPolicy, cluster: &'a str) -> Self {
        Self {
            catalog,
            policy,
            cluster,
        }
    }

    /// Evaluate every resource in the scope (`None` = fleet) and reduce.
    ///
    /// One resource failing to evaluate contributes an empty result and
    /// is counted skipped; only the listing call itself can fail the
    /// whole report.
    pub fn generate(
        &self,
        store: &dyn ResourceStore,
        scope: Option<&str>,
    ) -> Result<ComplianceReport, StoreError> {
        let resources = store.fetch_many(scope.unwrap_or("*"))?;

        let mut aggregate = EvaluationResult::empty();
        let mut evaluated = 0usize;
        let mut skipped = 0usize;

        for resource in &resources {
            if !resource.is_object() {
                warn!("skipping non-object resource document in scope scan");
                skipped += 1;
                continue;
            }
            let identity = ResourceIdentity::from_document(resource);
            if self.policy.is_excluded(&identity.namespace) {
                skipped += 1;
                continue;
            }
            let rules = self.catalog.effective(&identity.kind);
            aggregate.merge(evaluate_resource(resource, &rules, self.policy));
            evaluated += 1;
        }

        let total = aggregate.summary.total_rules;
        let overall_compliance = if total == 0 {
            // No applicable rules anywhere in scope: vacuously compliant.
            100.0
        } else {
            round2(aggregate.summary.passed_rules as f64 / total as f64 * 100.0)
        };

        let recommendations = recommendations_for(&aggregate);

        Ok(ComplianceReport {
            timestamp: now_secs(),
            cluster: self.cluster.to_string(),
            scope: scope.map(str::to_string),
            overall_compliance,
            summary: aggregate,
            recommendations,
            resources_evaluated: evaluated,
            resources_skipped: skipped,
        })
    }
}

/// One recommendation per category with at least one record anywhere in
/// the aggregate, plus the auto-fixable count when non-zero.
fn recommendations_for(aggregate: &EvaluationResult) -> Vec<String> {
    let mut recommendations = Vec::new();
    for category in Category::ALL {
        let count = aggregate
            .summary
            .violations_by_category
            .get(&category)
            .copied()
            .unwrap_or(0);
        if count > 0 {
            recommendations.push(format!("{}: {}", category, category_advice(category)));
        }
    }
    let fixable = aggregate.auto_fixable_count();
    if fixable > 0 {
        recommendations.push(format!(
            "{fixable} issue(s) can be fixed automatically; run auto-remediation to resolve them"
        ));
    }
    recommendations
}

fn category_advice(category: Category) -> &'static str {
    match category {
        Category::Security => {
            "harden container security contexts (privileged mode, non-root execution, read-only root filesystems)"
        }
        Category::Compliance => "align image sources and required labels with organizational standards",
        Category::Performance => "add liveness and readiness probes so the platform can manage workload health",
        Category::Cost => "set resource requests and limits to improve scheduling and cost attribution",
        Category::Operations => "review replica counts for availability and capacity headroom",
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::store::MemoryStore;

    fn bare(name: &str, namespace: &str) -> serde_json::Value {
        json!({
            "kind": "Deployment",
            "metadata": {"name": name, "namespace": namespace},
            "spec": {
                "replicas": 2,
                "template": {"spec": {"containers": [{"name": name, "image": format!("registry.internal/{name}:1")}]}}
            }
        })
    }

    #[test]
    fn test_aggregation_is_additive_over_resources() {
        let store = MemoryStore::new();
        store.insert("payments", "api", bare("api", "payments"));
        store.insert("payments", "worker", bare("worker", "payments"));

        let catalog = RuleCatalog::with_defaults();
        let policy = EnforcementPolicy::default();
        let per_resource = catalog.effective("Deployment").len();

        let aggregator = ComplianceAggregator::new(&catalog, &policy, "test");
        let report = aggregator.generate(&store, Some("payments")).unwrap();

        assert_eq!(report.resources_evaluated, 2);
        assert_eq!(report.summary.summary.total_rules, 2 * per_resource);
        assert_eq!(report.scope.as_deref(), Some("payments"));
    }

    #[test]
    fn test_empty_scope_is_vacuously_compliant() {
        let store = MemoryStore::new();
        let catalog = RuleCatalog::with_defaults();
        let policy = EnforcementPolicy::default();
        let aggregator = ComplianceAggregator::new(&catalog, &policy, "test");

        // No resources at all: totalRules == 0 yields 100 by convention.
        let report = aggregator.generate(&store, None).unwrap();
        assert_eq!(report.summary.summary.total_rules, 0);
        assert_eq!(report.overall_compliance, 100.0);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_compliance_percentage_is_two_decimal() {
        let store = MemoryStore::new();
        store.insert("default", "a", bare("a", "default"));
        let catalog = RuleCatalog::with_defaults();
        let policy = EnforcementPolicy::default();
        let aggregator = ComplianceAggregator::new(&catalog, &policy, "test");

        let report = aggregator.generate(&store, None).unwrap();
        let summary = &report.summary.summary;
        let expected =
            (summary.passed_rules as f64 / summary.total_rules as f64 * 10000.0).round() / 100.0;
        assert_eq!(report.overall_compliance, expected);
        assert!(report.overall_compliance < 100.0);
    }

    #[test]
    fn test_excluded_namespaces_are_skipped() {
        let config = serde_json::from_value(json!({
            "organization": {"name": "acme", "environment": "prod"},
            "global": {"excludedNamespaces": ["kube-system"]}
        }))
        .unwrap();
        let store = MemoryStore::new();
        store.insert("kube-system", "dns", bare("dns", "kube-system"));
        store.insert("payments", "api", bare("api", "payments"));

        let catalog = RuleCatalog::with_defaults();
        let policy = EnforcementPolicy::from_config(Some(&config));
        let aggregator = ComplianceAggregator::new(&catalog, &policy, "test");

        let report = aggregator.generate(&store, None).unwrap();
        assert_eq!(report.resources_evaluated, 1);
        assert_eq!(report.resources_skipped, 1);
        assert!(report
            .summary
            .violations
            .iter()
            .chain(report.summary.warnings.iter())
            .all(|v| v.namespace != "kube-system"));
    }

    #[test]
    fn test_degenerate_resource_contributes_empty_result() {
        let store = MemoryStore::new();
        store.insert("default", "bogus", json!("not an object"));
        store.insert("default", "api", bare("api", "default"));

        let catalog = RuleCatalog::with_defaults();
        let policy = EnforcementPolicy::default();
        let aggregator = ComplianceAggregator::new(&catalog, &policy, "test");

        let report = aggregator.generate(&store, None).unwrap();
        assert_eq!(report.resources_evaluated, 1);
        assert_eq!(report.resources_skipped, 1);
    }

    #[test]
    fn test_recommendations_cover_failing_categories_and_fixables() {
        let store = MemoryStore::new();
        store.insert("default", "api", bare("api", "default"));
        let catalog = RuleCatalog::with_defaults();
        let policy = EnforcementPolicy::default();
        let aggregator = ComplianceAggregator::new(&catalog, &policy, "test");

        let report = aggregator.generate(&store, None).unwrap();
        // The bare deployment fails security, compliance, performance,
        // and cost rules; every failing category gets one line.
        for prefix in ["security:", "compliance:", "performance:", "cost:"] {
            assert!(
                report.recommendations.iter().any(|r| r.starts_with(prefix)),
                "missing recommendation {prefix}"
            );
        }
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("fixed automatically")));
    }
}

//! The engine facade exposed to callers (CLI / chat tool layer).
//!
//! One engine instance owns one immutable rule catalog and the
//! enforcement settings retained from its configuration. Multiple
//! instances may share a store for side-by-side what-if comparisons.

use serde_json::Value;
use tracing::{info, warn};

use warden_core::config::{validate_config, PolicyConfig, ValidationReport};
use warden_core::errors::StoreError;
use warden_core::rules::{Category, PolicyRule};

use crate::catalog::RuleCatalog;
use crate::compliance::{ComplianceAggregator, ComplianceReport};
use crate::enforcement::EnforcementPolicy;
use crate::evaluation::{evaluate_resource, EvaluationResult, ResourceIdentity, Violation};
use crate::remediation::{FixOutcome, Remediator};
use crate::store::ResourceStore;

pub struct PolicyEngine<'a> {
    catalog: RuleCatalog,
    policy: EnforcementPolicy,
    store: &'a dyn ResourceStore,
    cluster: String,
}

impl<'a> PolicyEngine<'a> {
    /// An engine over the built-in defaults only.
    pub fn new(store: &'a dyn ResourceStore) -> Self {
        Self {
            catalog: RuleCatalog::with_defaults(),
            policy: EnforcementPolicy::default(),
            store,
            cluster: "default".to_string(),
        }
    }

    /// An engine with a layered configuration. The validation report is
    /// returned alongside: an invalid configuration leaves defaults
    /// active rather than failing construction.
    pub fn with_config(store: &'a dyn ResourceStore, config: &PolicyConfig) -> (Self, ValidationReport) {
        let (catalog, report) = RuleCatalog::from_config(Some(config));
        if !report.is_valid {
            warn!(
                errors = report.errors.len(),
                "policy configuration is invalid; defaults remain active"
            );
        }
        let cluster = if config.organization.environment.is_empty() {
            "default".to_string()
        } else {
            config.organization.environment.clone()
        };
        let engine = Self {
            catalog,
            policy: EnforcementPolicy::from_config(Some(config)),
            store,
            cluster,
        };
        (engine, report)
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Fetch one resource and evaluate it against the effective rules
    /// for its kind.
    pub fn evaluate(&self, namespace: &str, name: &str) -> Result<EvaluationResult, StoreError> {
        let resource = self.store.fetch_one(namespace, name)?;
        Ok(self.evaluate_resource(&resource))
    }

    /// Evaluate an already-fetched resource document. Pure, no I/O.
    pub fn evaluate_resource(&self, resource: &Value) -> EvaluationResult {
        let identity = ResourceIdentity::from_document(resource);
        let rules = self.catalog.effective(&identity.kind);
        evaluate_resource(resource, &rules, &self.policy)
    }

    /// Apply fix routines for the given violations, then write the
    /// resource back iff at least one fix changed it. Per-violation
    /// failures are collected in the outcome; only store errors abort.
    pub fn auto_fix(
        &self,
        namespace: &str,
        name: &str,
        violations: &[Violation],
    ) -> Result<FixOutcome, StoreError> {
        let mut resource = self.store.fetch_one(namespace, name)?;
        let remediator = Remediator::new(&self.catalog, &self.policy);
        let (outcome, changed) = remediator.remediate(&mut resource, violations);
        if changed {
            self.store.replace(namespace, name, &resource)?;
            info!(
                %namespace, %name,
                fixed = outcome.fixed,
                failed = outcome.failed,
                "wrote back remediated resource"
            );
        }
        Ok(outcome)
    }

    /// Compliance report over a namespace, or the whole fleet when
    /// `scope` is `None`.
    pub fn generate_report(&self, scope: Option<&str>) -> Result<ComplianceReport, StoreError> {
        ComplianceAggregator::new(&self.catalog, &self.policy, &self.cluster)
            .generate(self.store, scope)
    }

    /// Rules in the catalog, optionally filtered by category.
    pub fn list_rules(&self, category: Option<Category>) -> Vec<&PolicyRule> {
        match category {
            Some(category) => self.catalog.list_by_category(category),
            None => self.catalog.list(),
        }
    }

    /// Validate a raw configuration document against this engine's
    /// catalog: structural checks plus unmatched override ids.
    pub fn validate_configuration(&self, doc: &Value) -> ValidationReport {
        let config: PolicyConfig = match serde_json::from_value(doc.clone()) {
            Ok(config) => config,
            Err(err) => {
                let mut report = ValidationReport::new();
                report.error(format!("configuration document is malformed: {err}"));
                return report;
            }
        };
        let mut report = validate_config(&config);
        for id in config.rule_overrides.keys() {
            if self.catalog.get(id).is_none() {
                report.warning(format!("ruleOverrides: no rule with id '{id}'"));
            }
        }
        report
    }
}

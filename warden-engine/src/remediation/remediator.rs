//! The remediator: applies fix routines for auto-fixable violations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::catalog::RuleCatalog;
use crate::enforcement::EnforcementPolicy;
use crate::evaluation::Violation;

use super::fixes::lookup_routine;
use super::patch::apply_all;

/// Result of one remediation batch: `{fixed, failed, errors}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixOutcome {
    pub fixed: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl FixOutcome {
    fn fail(&mut self, message: String) {
        self.failed += 1;
        self.errors.push(message);
    }
}

/// Applies declared fix routines to one resource document.
///
/// Individual failures are caught and counted, never aborting the rest
/// of the batch. The caller issues the single write-back when the
/// returned `changed` flag is set; the remediator itself performs no
/// I/O.
pub struct Remediator<'a> {
    catalog: &'a RuleCatalog,
    policy: &'a EnforcementPolicy,
}

impl<'a> Remediator<'a> {
    pub fn new(catalog: &'a RuleCatalog, policy: &'a EnforcementPolicy) -> Self {
        Self { catalog, policy }
    }

    /// Apply fixes for the given violations. Returns the outcome and
    /// whether the document actually changed.
    pub fn remediate(&self, resource: &mut Value, violations: &[Violation]) -> (FixOutcome, bool) {
        let mut outcome = FixOutcome::default();
        let mut changed = false;

        for violation in violations {
            if !violation.can_auto_fix {
                outcome.fail(format!(
                    "violation of rule '{}' is not auto-fixable",
                    violation.rule_id
                ));
                continue;
            }
            if !self.policy.auto_fix_allowed(violation.category) {
                outcome.fail(format!(
                    "auto-fix is disabled for category '{}' (rule '{}')",
                    violation.category, violation.rule_id
                ));
                continue;
            }
            let Some(rule) = self.catalog.get(&violation.rule_id) else {
                outcome.fail(format!("no rule with id '{}' in catalog", violation.rule_id));
                continue;
            };
            let Some(name) = rule.fix_action() else {
                outcome.fail(format!("rule '{}' declares no fix routine", rule.id));
                continue;
            };
            let Some(routine) = lookup_routine(name) else {
                outcome.fail(format!("unknown fix routine '{name}' (rule '{}')", rule.id));
                continue;
            };

            let patches = routine(resource);
            match apply_all(resource, &patches) {
                Ok(did_change) => {
                    debug!(rule = %rule.id, routine = name, changed = did_change, "fix applied");
                    changed |= did_change;
                    outcome.fixed += 1;
                }
                Err(err) => {
                    outcome.fail(format!("fix routine '{name}' failed: {err}"));
                }
            }
        }

        (outcome, changed)
    }
}
